//! HTTP client for the phone's Tasker endpoint.
//!
//! Tasker's HTTP-request event profile exposes automation actions as plain
//! GET endpoints (`/torch/on`, `/app/launch/<name>`, ...). The client issues
//! those requests with a bounded timeout and reports the outcome in a shape
//! tools can hand directly to an LLM.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::PhoneConfig;

/// Client operation result type.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from talking to the phone.
///
/// Timeout and connect failures are distinguished because tools surface them
/// with different guidance (a timeout may mean the phone is asleep and worth
/// a wake-on-LAN attempt; a connect failure usually means wrong host/port).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request timed out")]
    Timeout,

    #[error("Cannot connect to phone at {endpoint}")]
    Connect { endpoint: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Short machine-readable code for error JSON payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect { .. } => "connect_failed",
            Self::Http(_) => "http_error",
            Self::Config(_) => "config_error",
        }
    }
}

/// Result of a single Tasker endpoint invocation.
///
/// Mirrors what Tasker reports: any 200 response means the action fired.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub status_code: u16,
    pub response: String,
}

/// HTTP proxy to a phone running Tasker.
#[derive(Debug, Clone)]
pub struct PhoneClient {
    http: reqwest::Client,
    host: String,
    port: u16,
    timeout: Duration,
}

impl PhoneClient {
    /// Build a client for the configured phone endpoint.
    pub fn new(config: &PhoneConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout,
        })
    }

    /// `host:port` the client targets.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for a Tasker endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    /// Issue `GET <path>` against the phone and classify the result.
    ///
    /// Any HTTP response is a successful round-trip: `success` reflects the
    /// status code. Only transport-level failures become errors.
    pub async fn get(&self, path: &str) -> ClientResult<CommandOutcome> {
        let url = self.url_for(path);
        debug!(%url, "calling Tasker endpoint");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else if e.is_connect() {
                ClientError::Connect {
                    endpoint: self.endpoint(),
                }
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(CommandOutcome {
            success: status == 200,
            status_code: status,
            // Tasker often replies with an empty body on success
            response: if body.is_empty() { "OK".to_string() } else { body },
        })
    }

    /// Percent-encode a value for use as a single URL path segment.
    pub fn encode_segment(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}
