// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::replay::StatusSnapshot;

use super::{block_on, Context};

pub fn run(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    block_on(ctx.observe())?;
    let snapshot = ctx.outbox.snapshot()?;
    match output {
        OutputFormat::Text => print!("{}", format_text(&snapshot)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&snapshot)?),
    }
    Ok(())
}

pub(crate) fn format_text(snapshot: &StatusSnapshot) -> String {
    let status = &snapshot.status;
    format!(
        "{}\n{} queued: {} pending, {} error\n",
        if snapshot.online { "online" } else { "offline" },
        status.total,
        status.pending,
        status.error
    )
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
