//! Report sources
//!
//! A source only moves the report; parsing happens in the chain so that
//! every stage is judged by the same rules.

use async_trait::async_trait;
use quake_common::FeedSource;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;

use crate::config::AcquisitionConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("empty response body")]
    EmptyBody,

    #[error("no earthquake records in {0} byte response")]
    NoRecords(usize),
}

/// Charset assumed when the response does not name one; the Kandilli
/// page is served as Turkish Windows text.
pub const FALLBACK_CHARSET: &str = "windows-1254";

/// Undecoded response body
#[derive(Debug, Clone, PartialEq)]
pub struct RawReport {
    pub body: Vec<u8>,
    /// `Content-Type` as sent by the server, if any
    pub content_type: Option<String>,
}

/// One stage of the acquisition chain
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Stage reported on the resulting feed
    fn kind(&self) -> FeedSource;

    /// Where this source fetches from, for logs
    fn endpoint(&self) -> &str;

    /// Fetch the report decoded as text
    async fn fetch_text(&self) -> Result<String, SourceError>;

    /// Fetch the report bytes untouched, for passing them on
    async fn fetch_raw(&self) -> Result<RawReport, SourceError> {
        let text = self.fetch_text().await?;
        Ok(RawReport {
            body: text.into_bytes(),
            content_type: Some("text/plain; charset=utf-8".to_string()),
        })
    }
}

/// Build the HTTP client shared by all stages.
///
/// The upstream server rejects requests without a browser-like user agent.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

/// Plain `GET` against a fixed URL
pub struct HttpSource {
    kind: FeedSource,
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(kind: FeedSource, url: impl Into<String>, client: Client) -> Self {
        Self {
            kind,
            url: url.into(),
            client,
        }
    }

    /// The upstream report itself
    pub fn direct(config: &AcquisitionConfig, client: Client) -> Self {
        Self::new(FeedSource::Direct, &config.upstream_url, client)
    }

    /// Same-origin relay that performs the direct fetch server-side
    pub fn local_relay(config: &AcquisitionConfig, client: Client) -> Self {
        Self::new(FeedSource::LocalRelay, &config.relay_url, client)
    }

    /// Public CORS relay; the upstream URL is passed percent-encoded
    pub fn public_relay(config: &AcquisitionConfig, client: Client) -> Self {
        let url = format!(
            "{}{}",
            config.public_relay_url,
            urlencoding::encode(&config.upstream_url)
        );
        Self::new(FeedSource::PublicRelay, url, client)
    }

    async fn get(&self) -> Result<Response, SourceError> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    fn kind(&self) -> FeedSource {
        self.kind
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn fetch_text(&self) -> Result<String, SourceError> {
        let body = self.get().await?.text_with_charset(FALLBACK_CHARSET).await?;
        if body.trim().is_empty() {
            return Err(SourceError::EmptyBody);
        }

        Ok(body)
    }

    async fn fetch_raw(&self) -> Result<RawReport, SourceError> {
        let response = self.get().await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?.to_vec();
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SourceError::EmptyBody);
        }

        Ok(RawReport { body, content_type })
    }
}
