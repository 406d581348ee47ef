//! Transport to the Stat-Xplore API
//!
//! [`Transport`] is the only boundary between the core and the network. The
//! core never looks at reqwest types; it only sees a [`TransportResponse`] with
//! the status, the headers and the raw body text.

use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Result, StatXploreError};

/// Response headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

impl From<&HeaderMap> for ResponseHeaders {
    fn from(map: &HeaderMap) -> Self {
        // Non-UTF-8 header values are dropped rather than lossily converted.
        map.iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            .collect()
    }
}

/// Raw provider response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: ResponseHeaders::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }

    /// Turn a non-success response into [`StatXploreError::UpstreamStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(StatXploreError::UpstreamStatus {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Issues requests against the provider.
///
/// `path` is relative to the configured base URL and always starts with `/`.
/// Implementations return non-success statuses as ordinary responses; only
/// failures to obtain a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<TransportResponse>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse>;
}

/// reqwest-backed transport carrying the `APIKey` header on every request.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&settings.api_key)
            .map_err(|_| StatXploreError::Config("API key is not a valid header value".into()))?;
        api_key.set_sensitive(true);
        // Header names are case-insensitive; the provider documents it as `APIKey`.
        headers.insert("apikey", api_key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")
            .map_err(StatXploreError::Transport)?;

        Ok(Self {
            client,
            base_url: settings.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn into_response(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let headers = ResponseHeaders::from(response.headers());
        let body = response
            .text()
            .await
            .context("Failed to read response body")
            .map_err(StatXploreError::Transport)?;
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<TransportResponse> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", path))
            .map_err(StatXploreError::Transport)?;
        let response = Self::into_response(response).await?;
        debug!(%url, status = response.status, "GET complete");
        Ok(response)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to post to {}", path))
            .map_err(StatXploreError::Transport)?;
        let response = Self::into_response(response).await?;
        debug!(%url, status = response.status, "POST complete");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let headers: ResponseHeaders = [("X-RateLimit-Remaining", "10")].into_iter().collect();
        assert_eq!(headers.get("x-ratelimit-remaining"), Some("10"));
        assert_eq!(headers.get("X-RATELIMIT-REMAINING"), Some("10"));
        assert!(headers.contains("X-RateLimit-Remaining"));
        assert!(!headers.contains("X-RateLimit"));
    }

    #[test]
    fn headers_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert("x-ratelimit", HeaderValue::from_static("2000"));
        let headers = ResponseHeaders::from(&map);
        assert_eq!(headers.get("X-RateLimit"), Some("2000"));
    }

    #[test]
    fn error_for_status() {
        let ok = TransportResponse::new(200, "{}").error_for_status();
        assert!(ok.is_ok());

        let err = TransportResponse::new(404, "missing")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.upstream(), Some((404, "missing")));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = Settings::default().with_base_url("http://localhost:1/rest/").unwrap();
        let transport = HttpTransport::new(&settings).unwrap();
        assert_eq!(transport.url("/schema"), "http://localhost:1/rest/schema");
    }
}
