// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for delivering HTTP mutations.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP delivery via reqwest for production
//! - Scripted mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use outbox_core::classify::is_ok_status;
use outbox_core::{Headers, Method, Mutation, Outcome, QueueItem};
use serde::Serialize;

/// Error type for transport operations.
///
/// Every variant means "no response was received" and is treated as a
/// retryable network failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The URL could not be resolved into an absolute request target.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection failed or was reset.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// No response within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// A request as it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl Request {
    /// Build a request from a caller's mutation, serializing its body.
    pub fn from_mutation(mutation: &Mutation) -> outbox_core::Result<Self> {
        Ok(Request {
            method: mutation.method,
            url: mutation.url.clone(),
            headers: mutation.effective_headers(),
            body: mutation.serialized_body()?,
        })
    }
}

impl From<&QueueItem> for Request {
    fn from(item: &QueueItem) -> Self {
        Request {
            method: item.method,
            url: item.url.clone(),
            headers: item.headers.clone(),
            body: item.body.clone(),
        }
    }
}

/// The server's answer to a delivered request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        is_ok_status(self.status)
    }
}

/// Fold a delivery attempt into an [`Outcome`] for classification.
pub fn outcome_of(result: &TransportResult<Response>) -> Outcome {
    match result {
        Ok(response) => Outcome::Status(response.status),
        Err(e) => Outcome::Network(e.to_string()),
    }
}

/// Transport trait for HTTP-like delivery.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Deliver a request and return the server's response.
    ///
    /// Returns `Err` only when no response was received.
    fn deliver(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + '_>>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport resolving relative URLs against `base_url`.
    pub fn new(base_url: Option<String>, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(HttpTransport {
            client,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            timeout,
        })
    }

    /// Resolve an item URL into an absolute request target.
    pub fn resolve(&self, url: &str) -> TransportResult<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!("{}/{}", base, url.trim_start_matches('/'))),
            None => Err(TransportError::InvalidRequest(format!(
                "relative url '{}' requires base_url in config",
                url
            ))),
        }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

/// Upper bound on the response body kept in a [`Response`].
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Read at most [`MAX_BODY_BYTES`] of the body. A body that fails to read
/// mid-stream is kept up to the failure.
async fn read_body(mut response: reqwest::Response) -> String {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_BODY_BYTES - buf.len();
                if chunk.len() >= room {
                    buf.extend_from_slice(&chunk[..room]);
                    tracing::debug!(limit = MAX_BODY_BYTES, "response body truncated");
                    break;
                }
                buf.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("failed to read response body: {}", e);
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl Transport for HttpTransport {
    fn deliver(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + '_>> {
        Box::pin(async move {
            let url = self.resolve(&request.url)?;

            let mut builder = self.client.request(reqwest_method(request.method), &url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::ConnectionFailed(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            // Status alone decides the outcome; the body is informational.
            let body = read_body(response).await;
            Ok(Response { status, body })
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
