// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the outboxrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
/// Delivery failures are not errors: they are recorded on the queued item and
/// reported through drain summaries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'outbox init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("queue item not found: {0}")]
    ItemNotFound(String),

    #[error("queue is full ({max} items)\n  hint: run 'outbox drain', or set [queue] overflow = \"drop_oldest\"")]
    QueueFull { max: usize },

    #[error("invalid method: '{0}'\n  hint: valid methods are: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS")]
    InvalidMethod(String),

    #[error("invalid header: '{0}'\n  hint: headers are written as 'Name: value'")]
    InvalidHeader(String),

    #[error("invalid body: {0}\n  hint: the body must be valid JSON")]
    InvalidBody(String),

    #[error("invalid url: '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("rejected by server: HTTP {status}\n  hint: the mutation was not queued")]
    Rejected { status: u16 },

    #[error("refusing to clear {count} queued item(s) without --yes")]
    ClearNotConfirmed { count: usize },

    #[error("unsupported queue format version {found} (this build reads up to {supported})\n  hint: upgrade outbox before touching this queue")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("another runner is already active for {0}")]
    AlreadyRunning(String),

    #[error("lock error: {0}")]
    Lock(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted queue file: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for outboxrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<outbox_core::Error> for Error {
    fn from(e: outbox_core::Error) -> Self {
        match e {
            outbox_core::Error::QueueFull { max } => Error::QueueFull { max },
            outbox_core::Error::ItemNotFound(id) => Error::ItemNotFound(id),
            outbox_core::Error::InvalidMethod(m) => Error::InvalidMethod(m),
            outbox_core::Error::InvalidStatus(s) => {
                Error::CorruptedData(format!("invalid item status '{}'", s))
            }
            outbox_core::Error::UnsupportedVersion { found, supported } => {
                Error::UnsupportedVersion { found, supported }
            }
            outbox_core::Error::CorruptedData(s) => Error::CorruptedData(s),
            outbox_core::Error::Lock(s) => Error::Lock(s),
            outbox_core::Error::Io(e) => Error::Io(e),
            outbox_core::Error::Json(e) => Error::Json(e),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
