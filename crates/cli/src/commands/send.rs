// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::{OutputFormat, RequestArgs};
use crate::error::{Error, Result};
use crate::replay::{SendResult, OFFLINE_REASON};

use super::{block_on, Context};

pub fn run(request: RequestArgs, output: OutputFormat) -> Result<()> {
    let mutation = request.to_mutation()?;
    let ctx = Context::open()?;
    let result = block_on(async {
        ctx.observe().await;
        ctx.outbox.send(&mutation).await
    })??;

    match output {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    check(&result)
}

/// A definitive rejection is reported as a failed command.
pub(crate) fn check(result: &SendResult) -> Result<()> {
    match &result.response {
        Some(response) if !result.ok && !result.queued => Err(Error::Rejected {
            status: response.status,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn format_text(result: &SendResult) -> String {
    let mut out = String::new();
    match (&result.response, &result.id) {
        (_, Some(id)) => {
            let reason = result
                .response
                .as_ref()
                .map(|r| format!("HTTP {}", r.status))
                .unwrap_or_else(|| OFFLINE_REASON.to_string());
            out.push_str(&format!("Queued {} ({})\n", id, reason));
        }
        (Some(response), None) => {
            if result.ok {
                out.push_str(&format!("Delivered: HTTP {}\n", response.status));
            }
            if !response.body.is_empty() {
                out.push_str(&response.body);
                if !response.body.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        (None, None) => {}
    }
    out
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
