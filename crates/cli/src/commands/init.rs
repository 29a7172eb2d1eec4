// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use outbox_core::OverflowPolicy;

use crate::config::{init_outbox_dir, Config};
use crate::error::Result;

pub fn run(
    base_url: Option<String>,
    path: Option<String>,
    max_items: Option<usize>,
    overflow: Option<OverflowPolicy>,
) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let (outbox_dir, config) = run_impl(&target_path, base_url, max_items, overflow)?;

    println!("Initialized outbox at {}", outbox_dir.display());
    match &config.base_url {
        Some(url) => println!("Base URL: {}", url),
        None => println!("Base URL: (none, item URLs must be absolute)"),
    }
    if config.queue.max_items == 0 {
        println!("Queue: unbounded");
    } else {
        println!(
            "Queue: up to {} items ({})",
            config.queue.max_items, config.queue.overflow
        );
    }
    Ok(())
}

pub(crate) fn run_impl(
    target_path: &Path,
    base_url: Option<String>,
    max_items: Option<usize>,
    overflow: Option<OverflowPolicy>,
) -> Result<(PathBuf, Config)> {
    let mut config = Config::new(base_url)?;
    if let Some(max) = max_items {
        config.queue.max_items = max;
    }
    if let Some(policy) = overflow {
        config.queue.overflow = policy;
    }
    let outbox_dir = init_outbox_dir(target_path, &config)?;
    Ok((outbox_dir, config))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
