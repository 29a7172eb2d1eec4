// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    /// Overrides discovery of the `.outbox/` directory.
    pub const OUTBOX_DIR: &str = "OUTBOX_DIR";
}

/// Returns the value of `OUTBOX_DIR` if set and non-empty.
pub fn outbox_dir() -> Option<PathBuf> {
    std::env::var(vars::OUTBOX_DIR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
