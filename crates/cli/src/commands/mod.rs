// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod drain;
pub mod enqueue;
pub mod init;
pub mod list;
pub mod run;
pub mod send;
pub mod status;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use outbox_core::{FileStore, Store};

use crate::config::{find_outbox_dir, queue_path, Config};
use crate::error::{Error, Result};
use crate::replay::{AssumeOnline, Connectivity, HttpProbe, HttpTransport, Outbox, Probe};

/// Everything a command needs: the located `.outbox/` directory, its config,
/// and an outbox wired to the on-disk queue.
pub struct Context {
    pub outbox_dir: PathBuf,
    pub config: Config,
    pub outbox: Arc<Outbox>,
    pub probe: Arc<dyn Probe>,
}

impl Context {
    /// Open the outbox for the current directory.
    pub fn open() -> Result<Self> {
        Self::open_at(find_outbox_dir()?)
    }

    pub fn open_at(outbox_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&outbox_dir)?;
        let store: Arc<dyn Store> = Arc::new(FileStore::new(queue_path(&outbox_dir)));
        let transport = HttpTransport::new(config.base_url.clone(), config.request_timeout())
            .map_err(|e| Error::Transport(e.to_string()))?;
        // Offline until the first probe says otherwise.
        let connectivity = Arc::new(Connectivity::new(false));
        let outbox = Arc::new(Outbox::new(
            store,
            Arc::new(transport),
            connectivity,
            config.queue_limit(),
        ));
        let probe = build_probe(&config)?;
        Ok(Context {
            outbox_dir,
            config,
            outbox,
            probe,
        })
    }

    /// Probe once and record the result.
    pub async fn observe(&self) -> bool {
        let online = self.probe.check().await;
        self.outbox.connectivity().set_online(online);
        online
    }
}

/// The configured reachability probe. Without a probe or base URL the
/// service is assumed reachable and delivery failures drive retries.
pub fn build_probe(config: &Config) -> Result<Arc<dyn Probe>> {
    match config.probe_url() {
        Some(url) => {
            let probe = HttpProbe::new(url, config.probe_timeout())
                .map_err(|e| Error::Transport(e.to_string()))?;
            Ok(Arc::new(probe))
        }
        None => Ok(Arc::new(AssumeOnline)),
    }
}

/// Drive a future to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
