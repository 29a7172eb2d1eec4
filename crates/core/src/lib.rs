// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: Shared library for the outbox mutation queue
//!
//! This crate provides the queue data model, failure classification, status
//! projection, and durable storage used by the `outbox` CLI and replay engine.

pub mod capacity;
pub mod classify;
pub mod error;
pub mod item;
pub mod status;
pub mod store;

pub use capacity::{OverflowPolicy, QueueLimit};
pub use classify::{classify, should_queue, Disposition, Outcome};
pub use error::{Error, Result};
pub use item::{Headers, ItemId, ItemStatus, Method, Mutation, QueueItem};
pub use status::{DrainSummary, QueueStatus};
pub use store::{DrainClaim, FileStore, MemoryStore, Store, SCHEMA_VERSION};
