// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::ItemId;
use serde::Serialize;

use crate::cli::{OutputFormat, RequestArgs};
use crate::error::Result;
use crate::replay::Outbox;

use super::Context;

#[derive(Serialize)]
struct EnqueueJson<'a> {
    id: &'a ItemId,
}

pub fn run(request: RequestArgs, error: Option<String>, output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let id = run_impl(&ctx.outbox, &request, error)?;
    match output {
        OutputFormat::Text => println!("Queued {}", id),
        OutputFormat::Json => println!("{}", serde_json::to_string(&EnqueueJson { id: &id })?),
    }
    Ok(())
}

pub(crate) fn run_impl(
    outbox: &Outbox,
    request: &RequestArgs,
    error: Option<String>,
) -> Result<ItemId> {
    let mutation = request.to_mutation()?;
    outbox.enqueue(&mutation, error)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
