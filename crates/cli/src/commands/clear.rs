// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::ItemId;

use crate::error::{Error, Result};
use crate::replay::Outbox;

use super::Context;

pub fn clear(yes: bool) -> Result<()> {
    let ctx = Context::open()?;
    let removed = clear_impl(&ctx.outbox, yes)?;
    println!("Cleared {} item(s)", removed);
    Ok(())
}

/// A non-empty queue is only cleared when confirmed.
pub(crate) fn clear_impl(outbox: &Outbox, yes: bool) -> Result<usize> {
    let count = outbox.status()?.total;
    if count > 0 && !yes {
        return Err(Error::ClearNotConfirmed { count });
    }
    outbox.clear()
}

pub fn remove(id: &str) -> Result<()> {
    let ctx = Context::open()?;
    let item = ctx.outbox.remove(&ItemId::from(id))?;
    println!("Removed {} ({} {})", item.id, item.method, item.url);
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
