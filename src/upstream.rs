//! Client for the upstream products/QA/reviews API.
//!
//! Every call carries the configured token in the `authorization` header and
//! yields either an [`UpstreamResponse`] for 2xx answers or an [`AppError`]
//! that the error layer turns into the caller's response.

use crate::{AppError, Config, Result};
use anyhow::Context;
use axum::http::StatusCode;
use reqwest::{header::AUTHORIZATION, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.upstream_url)
            .with_context(|| format!("invalid UPSTREAM_URL {}", config.upstream_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("UPSTREAM_URL {} cannot be used as a base", base_url);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/{segments...}?{query}`. Segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    pub async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<UpstreamResponse> {
        let url = self.endpoint(segments, query);
        self.send(self.http.get(url)).await
    }

    /// POSTs `body` as JSON; `None` sends the request without a body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&T>,
    ) -> Result<UpstreamResponse> {
        let url = self.endpoint(segments, &[]);
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    /// PUT actions carry an empty JSON object.
    pub async fn put(&self, segments: &[&str]) -> Result<UpstreamResponse> {
        let url = self.endpoint(segments, &[]);
        self.send(self.http.put(url).json(&json!({}))).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<UpstreamResponse> {
        let response = request
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body = parse_body(&bytes);

        if status.is_success() {
            tracing::debug!("Upstream answered {}", status);
            Ok(UpstreamResponse { status, body })
        } else {
            Err(AppError::Upstream { status, body })
        }
    }
}

/// JSON when it parses, raw text otherwise.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
