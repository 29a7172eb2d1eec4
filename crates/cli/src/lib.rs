// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outboxrs - A durable offline queue for HTTP mutations.
//!
//! This crate provides the `outbox` CLI and the replay engine behind it.
//! Mutations that cannot be delivered are stored in `.outbox/queue.json`
//! and replayed in insertion order once the remote service is reachable.
//!
//! # Main Components
//!
//! - [`Outbox`] - Owned queue with immediate send and the drain engine
//! - [`Runner`] - Background loop tying connectivity probes to drains
//! - [`Transport`] / [`Probe`] - Injectable seams for delivery and reachability
//! - [`Config`] - Project configuration (base URL, queue bound, timings)
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use outbox_core::{FileStore, Method, Mutation, QueueLimit};
//! use outboxrs::{Connectivity, HttpTransport, Outbox};
//!
//! let transport = HttpTransport::new(Some("https://api.example.com".into()), timeout)?;
//! let outbox = Outbox::new(
//!     Arc::new(FileStore::new(".outbox/queue.json")),
//!     Arc::new(transport),
//!     Arc::new(Connectivity::new(true)),
//!     QueueLimit::default(),
//! );
//!
//! let result = outbox.send(&Mutation::new(Method::Post, "/api/orders")).await?;
//! let summary = outbox.drain().await?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod replay;

pub use cli::{Cli, Command, OutputFormat, RequestArgs};
pub use config::{find_outbox_dir, init_outbox_dir, Config};
pub use error::{Error, Result};
pub use replay::{
    AssumeOnline, Connectivity, HttpProbe, HttpTransport, Outbox, Probe, Request, Response,
    Runner, RunnerConfig, SendResult, StatusSnapshot, Transport, TransportError,
};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    if !matches!(command, Command::Run) {
        logging::setup_cli();
    }

    match command {
        Command::Init {
            base_url,
            path,
            max_items,
            overflow,
        } => commands::init::run(base_url, path, max_items, overflow),
        Command::Enqueue {
            request,
            error,
            output,
        } => commands::enqueue::run(request, error, output),
        Command::Send { request, output } => commands::send::run(request, output),
        Command::Drain { output } => commands::drain::run(output),
        Command::Status { output } => commands::status::run(output),
        Command::List {
            status,
            feature,
            output,
        } => commands::list::run(status, feature, output),
        Command::RetryFailed { output } => commands::drain::retry_failed(output),
        Command::Remove { id } => commands::clear::remove(&id),
        Command::Clear { yes } => commands::clear::clear(yes),
        Command::Run => commands::run::run(),
    }
}
