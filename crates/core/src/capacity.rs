// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue bounds and overflow handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::QueueItem;

/// What to do when an item arrives at a full queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the new item with [`Error::QueueFull`].
    #[default]
    RejectNewest,
    /// Evict the oldest item to make room.
    DropOldest,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::RejectNewest => "reject_newest",
            OverflowPolicy::DropOldest => "drop_oldest",
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.replace('-', "_").to_lowercase().as_str() {
            "reject_newest" => Ok(OverflowPolicy::RejectNewest),
            "drop_oldest" => Ok(OverflowPolicy::DropOldest),
            _ => Err(format!(
                "invalid overflow policy '{}': expected reject_newest or drop_oldest",
                s
            )),
        }
    }
}

/// Maximum queue length and its overflow behaviour. `max_items == 0` means
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueLimit {
    pub max_items: usize,
    pub overflow: OverflowPolicy,
}

impl QueueLimit {
    pub fn unbounded() -> Self {
        QueueLimit {
            max_items: 0,
            overflow: OverflowPolicy::RejectNewest,
        }
    }

    pub fn new(max_items: usize, overflow: OverflowPolicy) -> Self {
        QueueLimit {
            max_items,
            overflow,
        }
    }

    fn is_full(&self, len: usize) -> bool {
        self.max_items > 0 && len >= self.max_items
    }

    /// Append `item`, applying the overflow policy. Returns any evicted items,
    /// oldest first.
    pub fn push(&self, items: &mut Vec<QueueItem>, item: QueueItem) -> Result<Vec<QueueItem>> {
        let mut evicted = Vec::new();
        if self.is_full(items.len()) {
            match self.overflow {
                OverflowPolicy::RejectNewest => {
                    return Err(Error::QueueFull {
                        max: self.max_items,
                    });
                }
                OverflowPolicy::DropOldest => {
                    let excess = items.len() + 1 - self.max_items;
                    evicted.extend(items.drain(..excess));
                }
            }
        }
        items.push(item);
        Ok(evicted)
    }
}

impl Default for QueueLimit {
    fn default() -> Self {
        QueueLimit::new(1000, OverflowPolicy::RejectNewest)
    }
}

#[cfg(test)]
#[path = "capacity_tests.rs"]
mod tests;
