use crate::extract::Payload;
use crate::models::UploadRequest;
use crate::{AppError, AppState, Result};
use axum::{extract::State, http::StatusCode, Json};
use futures_util::future::join_all;
use serde_json::Value;
use std::sync::Arc;

/// Uploads every image concurrently; the batch succeeds only if all of them do.
///
/// Uploads that already went through are kept when a sibling fails.
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<UploadRequest>,
) -> Result<(StatusCode, Json<Vec<Value>>)> {
    let images = request.images();
    tracing::info!("Uploading {} image(s)", images.len());

    let uploads = images.iter().map(|image| {
        let media = state.media.clone();
        async move {
            match image {
                Value::String(payload) => media.upload(payload).await,
                _ => Err(AppError::Media(
                    "Image payload must be a string".to_string(),
                )),
            }
        }
    });

    let results = join_all(uploads)
        .await
        .into_iter()
        .collect::<Result<Vec<Value>>>()?;

    Ok((StatusCode::CREATED, Json(results)))
}
