// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background runner: probes connectivity and drains the outbox.
//!
//! Drain triggers:
//! 1. Transition to online (immediate)
//! 2. Fixed interval while online, to recover from missed transitions and
//!    retry items halted by a transient failure
//!
//! The status snapshot is re-published on every probe tick so that writes
//! from other processes sharing the queue file reach subscribers.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::connectivity::Probe;
use super::outbox::Outbox;
use crate::config::Config;
use crate::error::Result;

/// Timing for the runner loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub drain_interval: Duration,
    pub probe_interval: Duration,
}

impl RunnerConfig {
    pub fn from_config(config: &Config) -> Self {
        RunnerConfig {
            drain_interval: config.drain_interval(),
            probe_interval: config.probe_interval(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            drain_interval: Duration::from_secs(20),
            probe_interval: Duration::from_secs(5),
        }
    }
}

pub struct Runner {
    outbox: Arc<Outbox>,
    probe: Arc<dyn Probe>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(outbox: Arc<Outbox>, probe: Arc<dyn Probe>, config: RunnerConfig) -> Self {
        Runner {
            outbox,
            probe,
            config,
        }
    }

    /// Run until `cancel` fires. A drain cycle in flight is allowed to finish.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let mut online_rx = self.outbox.connectivity().subscribe();

        let mut probe_tick = tokio::time::interval(self.config.probe_interval);
        probe_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut drain_tick = tokio::time::interval(self.config.drain_interval);
        drain_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            drain_interval = ?self.config.drain_interval,
            probe_interval = ?self.config.probe_interval,
            "runner started"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                changed = online_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let online = *online_rx.borrow_and_update();
                    self.refresh();
                    if online {
                        self.drain_once().await;
                    }
                }

                _ = probe_tick.tick() => {
                    let online = self.probe.check().await;
                    self.outbox.connectivity().set_online(online);
                    self.refresh();
                }

                _ = drain_tick.tick() => {
                    if self.outbox.connectivity().is_online() {
                        self.drain_once().await;
                    }
                }
            }
        }

        tracing::info!("runner stopped");
        Ok(())
    }

    async fn drain_once(&self) {
        match self.outbox.drain().await {
            Ok(summary) => {
                tracing::debug!(
                    processed = summary.processed,
                    remaining = summary.remaining,
                    error = summary.error,
                    "drain"
                );
            }
            // Storage trouble is logged and retried on the next tick.
            Err(e) => tracing::error!("drain failed: {}", e),
        }
    }

    fn refresh(&self) {
        if let Err(e) = self.outbox.refresh() {
            tracing::warn!("failed to refresh status: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
