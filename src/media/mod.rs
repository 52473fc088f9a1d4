//! Image upload backends used by `POST /upload`.

pub mod cloudinary;
pub mod r2;

use crate::{AppError, Config, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub use cloudinary::CloudinaryUploader;
pub use r2::R2Uploader;

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Uploads one encoded image (data URI or remote URL) and returns the store's result object.
    async fn upload(&self, image: &str) -> Result<Value>;
}

/// Stand-in used when the selected backend has no credentials.
pub struct UnconfiguredUploader {
    backend: String,
}

#[async_trait]
impl MediaUploader for UnconfiguredUploader {
    async fn upload(&self, _image: &str) -> Result<Value> {
        Err(AppError::Media(format!(
            "Media backend '{}' is not configured",
            self.backend
        )))
    }
}

pub fn build_uploader(config: &Config) -> anyhow::Result<Arc<dyn MediaUploader>> {
    match config.media_backend.as_str() {
        "cloudinary" => match CloudinaryUploader::from_config(config)? {
            Some(uploader) => Ok(Arc::new(uploader)),
            None => Ok(unconfigured("cloudinary")),
        },
        "r2" => match R2Uploader::from_config(config) {
            Some(uploader) => Ok(Arc::new(uploader)),
            None => Ok(unconfigured("r2")),
        },
        other => anyhow::bail!("unsupported MEDIA_BACKEND: {}", other),
    }
}

fn unconfigured(backend: &str) -> Arc<dyn MediaUploader> {
    tracing::warn!(
        "Media backend {} is missing credentials, uploads will fail",
        backend
    );
    Arc::new(UnconfiguredUploader {
        backend: backend.to_string(),
    })
}
