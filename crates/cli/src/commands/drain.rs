// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::DrainSummary;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::{block_on, Context};

#[derive(Serialize)]
struct DrainJson {
    #[serde(flatten)]
    summary: DrainSummary,
    online: bool,
}

/// Run one drain cycle against the on-disk queue.
pub fn run(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let (summary, online) = block_on(async {
        let online = ctx.observe().await;
        ctx.outbox.drain().await.map(|s| (s, online))
    })??;
    print_summary(&summary, online, output)
}

/// Reset failed items to pending, then drain.
pub fn retry_failed(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let (reset, summary, online) = block_on(async {
        let online = ctx.observe().await;
        let reset = ctx.outbox.reset_failed()?;
        let summary = ctx.outbox.drain().await?;
        Ok::<_, Error>((reset, summary, online))
    })??;
    if output == OutputFormat::Text && reset > 0 {
        println!("Reset {} failed item(s)", reset);
    }
    print_summary(&summary, online, output)
}

fn print_summary(summary: &DrainSummary, online: bool, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}", format_summary(summary, online)),
        OutputFormat::Json => {
            let json = DrainJson {
                summary: *summary,
                online,
            };
            println!("{}", serde_json::to_string(&json)?);
        }
    }
    Ok(())
}

pub(crate) fn format_summary(summary: &DrainSummary, online: bool) -> String {
    if !online {
        return format!("Offline: {} item(s) waiting", summary.remaining);
    }
    let mut line = format!(
        "Delivered {}, {} remaining",
        summary.processed, summary.remaining
    );
    if summary.error > 0 {
        line.push_str(&format!(" ({} failed)", summary.error));
    }
    line
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
