//! Request body extraction for the relay routes.
//!
//! Browsers post either JSON or urlencoded forms. Any other content type, or an
//! empty body, yields the payload's default. A body that is too large or does not
//! parse is answered with the matching 4xx instead of being dropped.

use crate::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

pub struct Payload<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Ignored,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Ignored;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Ignored
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(req.headers());
        if kind == BodyKind::Ignored {
            return Ok(Payload(T::default()));
        }

        // Honors DefaultBodyLimit, so oversized bodies surface as 413 here
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Rejected {
                status: e.status(),
                message: e.body_text(),
            })?;
        if bytes.is_empty() {
            return Ok(Payload(T::default()));
        }

        let value = match kind {
            BodyKind::Json => {
                Json::<T>::from_bytes(&bytes)
                    .map_err(|e| AppError::Rejected {
                        status: e.status(),
                        message: e.body_text(),
                    })?
                    .0
            }
            BodyKind::Form => {
                serde_urlencoded::from_bytes(&bytes).map_err(|e| AppError::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("Failed to parse form: {}", e),
                })?
            }
            BodyKind::Ignored => T::default(),
        };

        Ok(Payload(value))
    }
}
