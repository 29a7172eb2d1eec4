// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground runner: probes connectivity and drains until Ctrl-C.
//!
//! Only one runner may own a queue at a time; this is enforced with an
//! exclusive lock on `.outbox/runner.lock`. One-shot commands may still
//! read and write the queue while a runner is active; a one-shot `drain`
//! that overlaps the runner's cycle is skipped by the store's drain claim.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fs2::FileExt;
use tokio_util::sync::CancellationToken;

use crate::config::{find_outbox_dir, log_path, runner_lock_path};
use crate::error::{Error, Result};
use crate::logging;
use crate::replay::{Runner, RunnerConfig, StatusSnapshot};

use super::Context;

pub fn run() -> Result<()> {
    let outbox_dir = find_outbox_dir()?;
    let _lock = acquire_lock(&runner_lock_path(&outbox_dir))?;
    logging::setup_runner(&log_path(&outbox_dir));

    let ctx = Context::open_at(outbox_dir)?;
    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Runtime(e.to_string()))?;
    runtime.block_on(run_impl(ctx))
}

async fn run_impl(ctx: Context) -> Result<()> {
    let cancel = CancellationToken::new();
    let runner = Runner::new(
        Arc::clone(&ctx.outbox),
        Arc::clone(&ctx.probe),
        RunnerConfig::from_config(&ctx.config),
    );

    println!(
        "Watching {} (press Ctrl-C to stop)",
        ctx.outbox_dir.display()
    );
    println!("{}", format_snapshot(&ctx.outbox.refresh()?));

    let mut status_rx = ctx.outbox.subscribe();
    let printer = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let snapshot = *status_rx.borrow_and_update();
            println!("{}", format_snapshot(&snapshot));
        }
    });

    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
        }
        token.cancel();
    });

    let result = runner.run(cancel).await;
    printer.abort();
    result
}

fn acquire_lock(lock_path: &Path) -> Result<fs::File> {
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::AlreadyRunning(lock_path.display().to_string()))?;
    Ok(file)
}

pub(crate) fn format_snapshot(snapshot: &StatusSnapshot) -> String {
    format!(
        "[{}] {} queued, {} pending, {} error",
        if snapshot.online { "online" } else { "offline" },
        snapshot.status.total,
        snapshot.status.pending,
        snapshot.status.error
    )
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
