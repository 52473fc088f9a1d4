use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // Upstream API, the value is sent raw in the authorization header
    pub token: String,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    pub upstream_timeout_secs: Option<u64>,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_max_body_size")]
    pub max_body_mb: u64,

    #[serde(default = "default_media_backend")]
    pub media_backend: String,

    // Cloudinary settings
    pub cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    #[serde(default = "default_cloudinary_api_url")]
    pub cloudinary_api_url: String,

    // R2 settings
    pub r2_account_id: Option<String>,
    pub r2_access_key_id: Option<String>,
    pub r2_secret_access_key: Option<String>,
    #[serde(default = "default_bucket_name")]
    pub r2_bucket_name: String,
    pub r2_public_url: Option<String>,

    // Computed R2 endpoint
    #[serde(skip)]
    pub r2_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_url() -> String {
    "https://app-hrsei-api.herokuapp.com/api/fec2/hr-rpp".to_string()
}

fn default_static_dir() -> String {
    "client/dist".to_string()
}

fn default_max_body_size() -> u64 {
    50
}

fn default_media_backend() -> String {
    "cloudinary".to_string()
}

fn default_cloudinary_api_url() -> String {
    "https://api.cloudinary.com".to_string()
}

fn default_bucket_name() -> String {
    "storefront-uploads".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        let config: Config = envy::from_env()?;
        Ok(config.with_computed())
    }

    /// Config with defaults for everything but the token, pointing at `upstream_url`.
    pub fn new(token: impl Into<String>, upstream_url: impl Into<String>) -> Self {
        Config {
            host: default_host(),
            port: default_port(),
            token: token.into(),
            upstream_url: upstream_url.into(),
            upstream_timeout_secs: None,
            static_dir: default_static_dir(),
            max_body_mb: default_max_body_size(),
            media_backend: default_media_backend(),
            cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_api_url: default_cloudinary_api_url(),
            r2_account_id: None,
            r2_access_key_id: None,
            r2_secret_access_key: None,
            r2_bucket_name: default_bucket_name(),
            r2_public_url: None,
            r2_endpoint: None,
        }
        .with_computed()
    }

    fn with_computed(mut self) -> Self {
        self.r2_endpoint = self
            .r2_account_id
            .as_ref()
            .map(|account| format!("https://{}.r2.cloudflarestorage.com", account));
        self
    }

    pub fn max_request_body_bytes(&self) -> usize {
        (self.max_body_mb * 1024 * 1024) as usize
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
