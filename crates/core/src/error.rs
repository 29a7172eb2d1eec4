// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("queue is full ({max} items)\n  hint: drain the queue, or set [queue] overflow = \"drop_oldest\"")]
    QueueFull { max: usize },

    #[error("queue item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid method: '{0}'\n  hint: valid methods are: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS")]
    InvalidMethod(String),

    #[error("invalid item status: '{0}'\n  hint: valid statuses are: pending, error")]
    InvalidStatus(String),

    #[error("unsupported queue format version {found} (this build reads up to {supported})\n  hint: upgrade outbox before touching this queue")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("corrupted queue file: {0}")]
    CorruptedData(String),

    #[error("lock error: {0}")]
    Lock(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
