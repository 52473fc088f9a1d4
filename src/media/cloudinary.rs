//! Signed uploads to the Cloudinary image upload API.

use super::MediaUploader;
use crate::{AppError, Config, Result};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sha1::{Digest, Sha1};

pub struct CloudinaryUploader {
    http: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryUploader {
    pub fn new(
        api_url: &str,
        cloud_name: &str,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                api_url.trim_end_matches('/'),
                cloud_name
            ),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// `None` when any of the three credentials is missing.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            &config.cloud_name,
            &config.cloudinary_api_key,
            &config.cloudinary_api_secret,
        ) else {
            return Ok(None);
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build Cloudinary HTTP client")?;

        Ok(Some(Self::new(
            &config.cloudinary_api_url,
            cloud_name,
            api_key,
            api_secret,
            http,
        )))
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// Hex SHA-1 over `timestamp=<ts><secret>`, the only signed parameter we send.
pub fn sign(timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("timestamp={}{}", timestamp, api_secret).as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, image: &str) -> Result<Value> {
        let timestamp = chrono::Utc::now().timestamp();
        let timestamp_str = timestamp.to_string();
        let signature = sign(timestamp, &self.api_secret);

        let form = [
            ("file", image),
            ("api_key", self.api_key.as_str()),
            ("timestamp", timestamp_str.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .http
            .post(&self.upload_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("Cloudinary request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Media(format!("Invalid Cloudinary response: {}", e)))?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Cloudinary upload failed with status {}", status));
            return Err(AppError::Media(message));
        }

        let public_id = body
            .get("public_id")
            .and_then(|id| id.as_str())
            .unwrap_or("?");
        tracing::debug!("Uploaded image to Cloudinary: {}", public_id);
        Ok(body)
    }
}
