// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::{ItemStatus, QueueItem};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::Context;

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    items: Vec<&'a QueueItem>,
}

pub fn run(status: Option<ItemStatus>, feature: Option<String>, output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let items = ctx.outbox.items()?;
    let selected = select(&items, status, feature.as_deref());

    match output {
        OutputFormat::Text => {
            if selected.is_empty() {
                println!("No queued items");
            }
            for item in &selected {
                println!("{}", format_item_line(item));
            }
        }
        OutputFormat::Json => {
            let json = ListOutputJson { items: selected };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

/// Items matching the filters, in delivery order.
pub(crate) fn select<'a>(
    items: &'a [QueueItem],
    status: Option<ItemStatus>,
    feature: Option<&str>,
) -> Vec<&'a QueueItem> {
    items
        .iter()
        .filter(|item| status.is_none_or(|s| item.status == s))
        .filter(|item| feature.is_none_or(|f| item.feature.as_deref() == Some(f)))
        .collect()
}

/// Format: `{id} [{status}] {METHOD} {url} (attempts: n, last error: e) #feature`
pub(crate) fn format_item_line(item: &QueueItem) -> String {
    let mut line = format!(
        "{} [{}] {} {}",
        item.id, item.status, item.method, item.url
    );
    if item.attempts > 0 || item.last_error.is_some() {
        line.push_str(&format!(" (attempts: {}", item.attempts));
        if let Some(err) = &item.last_error {
            line.push_str(&format!(", last error: {}", err));
        }
        line.push(')');
    }
    if let Some(feature) = &item.feature {
        line.push_str(&format!(" #{}", feature));
    }
    line
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
