// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery outcome classification.
//!
//! Every decision about whether a delivery succeeded, must be retried, or was
//! permanently rejected goes through [`classify`]. Both the immediate send
//! path and the drain engine consume it, so the two can never disagree about
//! which HTTP statuses are worth retrying.

use std::fmt;

/// What happened when a mutation was put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server answered with this HTTP status.
    Status(u16),
    /// No response at all (timeout, DNS, connection reset, ...).
    Network(String),
}

impl Outcome {
    /// The failure reason recorded in `lastError`.
    pub fn reason(&self) -> String {
        match self {
            Outcome::Status(code) => status_reason(*code),
            Outcome::Network(message) => message.clone(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Status(code) => write!(f, "HTTP {}", code),
            Outcome::Network(message) => write!(f, "network error: {}", message),
        }
    }
}

/// How an [`Outcome`] affects the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Delivered; the item is dropped.
    Success,
    /// Client error other than 408/429. Retained as `error`, never blocks
    /// the items behind it.
    DefinitiveFailure { reason: String },
    /// Transient failure. Counted as an attempt; the drain cycle halts.
    RetryableFailure { reason: String },
}

impl Disposition {
    pub fn is_success(&self) -> bool {
        matches!(self, Disposition::Success)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Disposition::RetryableFailure { .. })
    }
}

/// Format an HTTP status as a `lastError` value.
pub fn status_reason(code: u16) -> String {
    format!("status:{}", code)
}

/// True for 2xx statuses.
pub fn is_ok_status(code: u16) -> bool {
    (200..300).contains(&code)
}

/// True for client errors the server will keep rejecting: 4xx except
/// 408 (Request Timeout) and 429 (Too Many Requests).
pub fn is_definitive_status(code: u16) -> bool {
    (400..500).contains(&code) && code != 408 && code != 429
}

/// Classify a delivery outcome.
pub fn classify(outcome: &Outcome) -> Disposition {
    match outcome {
        Outcome::Status(code) if is_ok_status(*code) => Disposition::Success,
        Outcome::Status(code) if is_definitive_status(*code) => Disposition::DefinitiveFailure {
            reason: status_reason(*code),
        },
        other => Disposition::RetryableFailure {
            reason: other.reason(),
        },
    }
}

/// Whether a failed immediate send should fall back to the queue.
///
/// Everything is queued while offline. Online, only retryable outcomes are;
/// successes and definitive rejections go straight back to the caller.
pub fn should_queue(outcome: &Outcome, online: bool) -> bool {
    !online || classify(outcome).is_retryable()
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
