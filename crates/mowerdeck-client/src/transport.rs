//! Device transport seam.
//!
//! The dashboard talks to the mower server over two fixed HTTP surfaces:
//! a GET poll endpoint returning the nested telemetry document, and a
//! write channel at `/api/<dotted.path>` where dotted path segments map to
//! slash-separated URL segments and the body is `value=<urlencoded>`.
//!
//! Everything above this module is network-free: the scheduler, panes and
//! editor only ever see the [`DeviceTransport`] trait.

use async_trait::async_trait;
use mowerdeck_core::{telemetry::TelemetrySnapshot, TransportError};
use std::time::{SystemTime, UNIX_EPOCH};

/// HTTP verb for the write channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Retrieve a resource.
    Get,
    /// Update a value.
    Put,
    /// Partially update a form-backed resource.
    Patch,
    /// Create an entity.
    Post,
    /// Remove an entity.
    Delete,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Put => write!(f, "PUT"),
            Verb::Patch => write!(f, "PATCH"),
            Verb::Post => write!(f, "POST"),
            Verb::Delete => write!(f, "DELETE"),
        }
    }
}

/// Result of one poll of the status endpoint.
///
/// `HttpError` is an outcome, not an `Err`: the cycle completed with a
/// response. Only network/decode failures surface as `TransportError`.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A body arrived and decoded.
    Data {
        /// The decoded snapshot.
        snapshot: TelemetrySnapshot,
        /// Response headers.
        headers: Vec<(String, String)>,
    },
    /// 2xx with a zero-length body.
    Empty {
        /// Response headers.
        headers: Vec<(String, String)>,
    },
    /// Explicit empty success (HTTP 204).
    NoContent {
        /// Response headers.
        headers: Vec<(String, String)>,
    },
    /// Non-2xx status.
    HttpError {
        /// The HTTP status code.
        status: u16,
        /// Response headers.
        headers: Vec<(String, String)>,
    },
}

/// Abstract channel to the mower server.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Poll the status endpoint once.
    async fn fetch_status(&self) -> Result<FetchOutcome, TransportError>;

    /// Send a write to `/api/<dotted.path>`, returning the raw response
    /// body. Dots in `path` become URL slashes.
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        value: Option<&str>,
    ) -> Result<String, TransportError>;
}

/// Convert a dotted command path into its URL form.
pub fn dotted_to_url_path(path: &str) -> String {
    path.replace('.', "/")
}

/// Interpret a write-channel response body: a numeric, non-zero body is an
/// acknowledgement; anything else is an operator-facing error message.
pub fn is_ack(body: &str) -> bool {
    body.trim()
        .parse::<f64>()
        .map(|n| n != 0.0)
        .unwrap_or(false)
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    status_path: String,
    cache_buster: bool,
}

impl HttpTransport {
    /// Create a transport for the given server.
    ///
    /// `base_url` has no trailing slash, e.g. `http://mower.local:8081`.
    /// `status_path` is the poll resource, e.g. `status`. When
    /// `cache_buster` is set, a timestamp suffix defeats intermediary
    /// caches on every poll.
    pub fn new(base_url: impl Into<String>, status_path: impl Into<String>, cache_buster: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            status_path: status_path.into(),
            cache_buster,
        }
    }

    fn status_url(&self) -> String {
        let mut url = format!("{}/{}", self.base_url, self.status_path);
        if self.cache_buster {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            url.push_str(&millis.to_string());
        }
        url
    }

    fn collect_headers(response: &reqwest::Response) -> Vec<(String, String)> {
        response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn fetch_status(&self) -> Result<FetchOutcome, TransportError> {
        let response = self
            .client
            .get(self.status_url())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let headers = Self::collect_headers(&response);

        if status.as_u16() == 204 {
            return Ok(FetchOutcome::NoContent { headers });
        }
        if !status.is_success() {
            return Ok(FetchOutcome::HttpError {
                status: status.as_u16(),
                headers,
            });
        }

        let body = response.text().await.map_err(|e| TransportError::Network {
            message: e.to_string(),
        })?;
        if body.is_empty() {
            return Ok(FetchOutcome::Empty { headers });
        }

        let snapshot =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode {
                message: e.to_string(),
            })?;
        Ok(FetchOutcome::Data { snapshot, headers })
    }

    async fn send(
        &self,
        verb: Verb,
        path: &str,
        value: Option<&str>,
    ) -> Result<String, TransportError> {
        let url = format!("{}/api/{}", self.base_url, dotted_to_url_path(path));
        let method = match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Put => reqwest::Method::PUT,
            Verb::Patch => reqwest::Method::PATCH,
            Verb::Post => reqwest::Method::POST,
            Verb::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!("{} {} value={:?}", verb, url, value);

        let response = self
            .client
            .request(method, url)
            .form(&[("value", value.unwrap_or("null"))])
            .send()
            .await
            .map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Network {
            message: e.to_string(),
        })
    }
}
