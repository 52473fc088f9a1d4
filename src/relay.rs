//! Success-side response policy shared by every relay route.

use crate::upstream::UpstreamResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// What the caller gets back once upstream has accepted the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Upstream body, verbatim.
    Forward,
    /// A fixed JSON string, whatever upstream sent.
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Relay {
    pub status: StatusCode,
    pub reply: Reply,
}

impl Relay {
    pub const fn forward(status: StatusCode) -> Self {
        Relay {
            status,
            reply: Reply::Forward,
        }
    }

    pub const fn fixed(status: StatusCode, message: &'static str) -> Self {
        Relay {
            status,
            reply: Reply::Fixed(message),
        }
    }

    /// Acknowledgement only: 204 and no body, whatever upstream sent.
    pub const fn no_content() -> Self {
        Relay::forward(StatusCode::NO_CONTENT)
    }

    pub fn respond(self, upstream: UpstreamResponse) -> Response {
        // 204 never carries a body
        if self.status == StatusCode::NO_CONTENT {
            return self.status.into_response();
        }

        match self.reply {
            Reply::Forward => (self.status, Json(upstream.body)).into_response(),
            Reply::Fixed(message) => (self.status, Json(message)).into_response(),
        }
    }
}
