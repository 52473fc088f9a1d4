use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Longest rendering of an upstream body written to the error log.
const LOGGED_BODY_CHARS: usize = 500;

const FALLBACK_MESSAGE: &str = "Server error";

#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream answered with a non-2xx status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Upstream { status: StatusCode, body: Value },

    /// No upstream response at all (connect, DNS, timeout).
    #[error("{0}")]
    Unreachable(String),

    #[error("{0}")]
    Media(String),

    #[error("Failed to send index.html")]
    StaticAsset(#[source] std::io::Error),

    /// The request body could not be read or parsed (oversized, malformed).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Unreachable(e.to_string())
    }
}

impl AppError {
    /// Status and JSON body sent back to the caller.
    fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            AppError::Upstream { status, body } if !is_falsy(body) => (*status, body.clone()),
            AppError::Upstream { status, .. } => (*status, error_envelope(&self.to_string())),
            AppError::Unreachable(_) | AppError::Media(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_envelope(&self.to_string()))
            }
            AppError::Rejected { status, message } => (*status, error_envelope(message)),
            AppError::StaticAsset(e) => {
                tracing::debug!("Static asset read failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, error_envelope(&self.to_string()))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        tracing::error!(
            status = status.as_u16(),
            message = %self,
            upstream = %truncate_for_log(&body),
            "Relay error"
        );

        (status, Json(body)).into_response()
    }
}

fn error_envelope(message: &str) -> Value {
    let message = if message.is_empty() {
        FALLBACK_MESSAGE
    } else {
        message
    };
    json!({ "error": message })
}

/// Bodies a JavaScript client would treat as "no data".
fn is_falsy(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Renders a body for the log: raw text for strings, compact JSON otherwise.
pub(crate) fn truncate_for_log(body: &Value) -> String {
    let rendered = match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    rendered.chars().take(LOGGED_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_error_is_forwarded_verbatim() {
        let err = AppError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: json!({ "message": "no such product" }),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "message": "no such product" }));
    }

    #[tokio::test]
    async fn test_upstream_text_body_is_forwarded_as_json_string() {
        let err = AppError::Upstream {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: Value::String("Error: invalid review".into()),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await, json!("Error: invalid review"));
    }

    #[tokio::test]
    async fn test_empty_upstream_body_falls_back_to_envelope() {
        let err = AppError::Upstream {
            status: StatusCode::FORBIDDEN,
            body: Value::String(String::new()),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Request failed with status code 403" })
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_500_envelope() {
        let response = AppError::Unreachable("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "connection refused" }));
    }

    #[tokio::test]
    async fn test_empty_message_uses_fallback() {
        let response = AppError::Unreachable(String::new()).into_response();
        assert_eq!(body_json(response).await, json!({ "error": "Server error" }));
    }

    #[tokio::test]
    async fn test_static_asset_failure_envelope() {
        let err = AppError::StaticAsset(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to send index.html" })
        );
    }

    #[tokio::test]
    async fn test_rejected_body_keeps_extractor_status() {
        let err = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "length limit exceeded" })
        );
    }

    #[test]
    fn test_truncate_for_log() {
        let long = Value::String("x".repeat(800));
        assert_eq!(truncate_for_log(&long).chars().count(), 500);

        let object = json!({ "a": 1 });
        assert_eq!(truncate_for_log(&object), r#"{"a":1}"#);

        let multibyte = Value::String("é".repeat(600));
        assert_eq!(truncate_for_log(&multibyte), "é".repeat(500));
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(&Value::Null));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!("")));
        assert!(is_falsy(&json!(false)));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
        assert!(!is_falsy(&json!("0")));
    }
}
