// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay engine: durable delivery of queued HTTP mutations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Caller    │────►│   Outbox    │────►│  Transport  │────► remote
//! │ (send/enq)  │     │ (drain eng) │     │   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                       │        ▲
//!                       ▼        │ online / offline
//!                 ┌──────────┐ ┌──────────────┐
//!                 │  Store   │ │ Connectivity │◄── Runner (probe + timers)
//!                 └──────────┘ └──────────────┘
//! ```
//!
//! # Features
//!
//! - Immediate send with fallback to the queue on retryable failure
//! - FIFO drain that halts on transient failures and skips past rejections
//! - Connectivity observer with HTTP reachability probe
//! - Fixed-interval background drain with graceful cancellation
//! - Injectable transport and probe traits for testing

mod connectivity;
mod outbox;
mod runner;
mod transport;

pub use connectivity::{AssumeOnline, Connectivity, HttpProbe, Probe};
pub use outbox::{Outbox, SendResult, StatusSnapshot, OFFLINE_REASON};
pub use runner::{Runner, RunnerConfig};
pub use transport::{
    HttpTransport, Request, Response, Transport, TransportError, TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;
