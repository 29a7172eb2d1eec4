// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only projections of queue state.

use serde::{Deserialize, Serialize};

use crate::item::QueueItem;

/// Aggregate counts over the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub total: usize,
    /// Items eligible for delivery (anything not in `error`).
    pub pending: usize,
    pub error: usize,
}

impl QueueStatus {
    pub fn from_items(items: &[QueueItem]) -> Self {
        let error = items.iter().filter(|item| item.is_error()).count();
        QueueStatus {
            total: items.len(),
            pending: items.len() - error,
            error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Result of one drain cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainSummary {
    /// Items delivered and removed this cycle.
    pub processed: usize,
    /// Queue length after the cycle.
    pub remaining: usize,
    /// Failures observed this cycle. For a skipped cycle, the number of items
    /// currently held in `error`.
    pub error: usize,
}

impl DrainSummary {
    /// Summary for a cycle that did no work (already running, or offline).
    pub fn skipped(status: &QueueStatus) -> Self {
        DrainSummary {
            processed: 0,
            remaining: status.total,
            error: status.error,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
