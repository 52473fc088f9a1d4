use super::MediaUploader;
use crate::{AppError, Config, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use uuid::Uuid;

/// Stores data-URI images in a Cloudflare R2 bucket.
pub struct R2Uploader {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl R2Uploader {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_url: Option<String>) -> Self {
        Self {
            client,
            bucket,
            public_url,
        }
    }

    /// `None` when the account or keys are missing.
    pub fn from_config(config: &Config) -> Option<Self> {
        let endpoint = config.r2_endpoint.as_ref()?;
        let access_key = config.r2_access_key_id.as_ref()?;
        let secret_key = config.r2_secret_access_key.as_ref()?;

        // Initialize S3 client for R2 (avoid aws-config to reduce dependencies/compile time)
        let s3_config = aws_sdk_s3::Config::builder()
            .endpoint_url(endpoint)
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key, secret_key, None, None, "r2",
            ))
            .region(aws_sdk_s3::config::Region::new("auto"))
            .build();

        Some(Self::new(
            aws_sdk_s3::Client::from_conf(s3_config),
            config.r2_bucket_name.clone(),
            config.r2_public_url.clone(),
        ))
    }
}

/// Splits `data:<mime>;base64,<payload>` into its content type and bytes.
pub fn decode_data_uri(image: &str) -> Result<DecodedImage> {
    let rest = image
        .strip_prefix("data:")
        .ok_or_else(|| AppError::Media("Image payload must be a data URI".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::Media("Malformed data URI".to_string()))?;
    let content_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::Media("Data URI must be base64 encoded".to_string()))?;

    let content_type = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::Media(format!("Invalid base64 image: {}", e)))?;

    Ok(DecodedImage {
        content_type: content_type.to_string(),
        data,
    })
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("bin"),
    }
}

fn build_key(ext: &str) -> String {
    let unique_id = Uuid::new_v4().simple().to_string();
    format!("uploads/{}.{}", unique_id, ext)
}

#[async_trait]
impl MediaUploader for R2Uploader {
    async fn upload(&self, image: &str) -> Result<Value> {
        let decoded = decode_data_uri(image)?;
        let ext = extension_for(&decoded.content_type);
        let key = build_key(ext);
        let size = decoded.data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(decoded.data))
            .content_type(&decoded.content_type)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("Failed to upload file: {}", e)))?;

        let mut result = json!({
            "public_id": key,
            "format": ext,
            "resource_type": "image",
            "bytes": size,
        });
        if let Some(base) = &self.public_url {
            result["url"] = json!(format!("{}/{}", base.trim_end_matches('/'), key));
        }
        Ok(result)
    }
}
