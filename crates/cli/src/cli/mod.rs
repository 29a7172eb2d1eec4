// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};
use outbox_core::{ItemStatus, OverflowPolicy};

pub use args::RequestArgs;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A durable offline queue for HTTP mutations")]
#[command(
    long_about = "A durable offline queue for HTTP mutations.\n\n\
    Mutations that cannot be delivered are persisted under .outbox/ and replayed \
    in order once the remote service is reachable again."
)]
pub struct Cli {
    /// Run as if outbox was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize an outbox in the current directory
    #[command(after_help = "\
Examples:
  outbox init --base-url https://api.example.com
  outbox init --max-items 500 --overflow drop-oldest")]
    Init {
        /// Base URL that relative item URLs are resolved against
        #[arg(long)]
        base_url: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,

        /// Maximum number of queued items (0 = unbounded)
        #[arg(long)]
        max_items: Option<usize>,

        /// What to do when the queue is full: reject-newest, drop-oldest
        #[arg(long)]
        overflow: Option<OverflowPolicy>,
    },

    /// Queue a mutation for later delivery without sending it
    #[command(after_help = "\
Examples:
  outbox enqueue POST /api/orders -d '{\"id\": 1}'
  outbox enqueue DELETE /api/orders/1 -f orders")]
    Enqueue {
        #[command(flatten)]
        request: RequestArgs,

        /// Reason recorded as the item's last error
        #[arg(long, short = 'e')]
        error: Option<String>,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Send a mutation now, queueing it if delivery fails transiently
    #[command(after_help = "\
Examples:
  outbox send PATCH /api/orders/1 -d '{\"qty\": 2}'
  outbox send POST https://other.example.com/x -H 'Authorization: Bearer t'")]
    Send {
        #[command(flatten)]
        request: RequestArgs,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Run one drain cycle
    Drain {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show queue counts and connectivity
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued items in delivery order
    List {
        /// Only show items with this status (pending, error)
        #[arg(long, short = 's')]
        status: Option<ItemStatus>,

        /// Only show items tagged with this feature
        #[arg(long, short = 'f')]
        feature: Option<String>,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Reset failed items to pending and drain
    RetryFailed {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Remove a single item
    Remove {
        /// Item id (see 'outbox list')
        id: String,
    },

    /// Remove every queued item
    Clear {
        /// Confirm removal of a non-empty queue
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Probe connectivity and drain in the foreground until interrupted
    Run,
}
