// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The outbox: an owned queue of HTTP mutations with a drain engine.
//!
//! # Drain protocol
//!
//! One drain cycle walks the queue in insertion order and delivers each
//! pending item:
//!
//! - success: the item is dropped
//! - definitive client failure: the item is marked `error` and the walk
//!   continues, so a poisoned item never blocks the ones behind it
//! - retryable failure (network error, 5xx, 408, 429): the attempt is counted
//!   and the walk halts, leaving every later item untouched
//!
//! Items already in `error` are skipped. The results are merged back into the
//! store by item id under the store lock, so items enqueued while the cycle
//! was in flight are preserved.
//!
//! At most one cycle runs at a time per queue: an in-process guard covers
//! concurrent triggers on one `Outbox`, and the store's drain claim covers
//! other processes sharing the same file. A trigger that arrives while a cycle
//! is in progress, or while offline, returns a skipped summary immediately.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use outbox_core::{
    classify, should_queue, Disposition, DrainSummary, ItemId, Mutation, Outcome, QueueItem,
    QueueLimit, QueueStatus, Store,
};
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::connectivity::Connectivity;
use super::transport::{outcome_of, Request, Response, Transport};
use crate::error::{Error, Result};

/// `lastError` recorded for items queued because the client was offline.
pub const OFFLINE_REASON: &str = "offline";

/// Result of [`Outbox::send`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendResult {
    /// True if the server accepted the mutation with a 2xx.
    pub ok: bool,
    /// True if the mutation was queued for later delivery.
    pub queued: bool,
    /// The server's response, if one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
    /// Id of the queued item, if queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

/// Queue counts together with the connectivity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    #[serde(flatten)]
    pub status: QueueStatus,
    pub online: bool,
}

/// Per-item change decided during a drain cycle.
enum Change {
    Delivered,
    Rejected(String),
    Retry(String),
}

pub struct Outbox {
    store: Arc<dyn Store>,
    transport: Arc<dyn Transport>,
    connectivity: Arc<Connectivity>,
    limit: QueueLimit,
    draining: Mutex<()>,
    status_tx: watch::Sender<StatusSnapshot>,
}

impl Outbox {
    pub fn new(
        store: Arc<dyn Store>,
        transport: Arc<dyn Transport>,
        connectivity: Arc<Connectivity>,
        limit: QueueLimit,
    ) -> Self {
        let initial = StatusSnapshot {
            status: QueueStatus::default(),
            online: connectivity.is_online(),
        };
        let (status_tx, _rx) = watch::channel(initial);
        Outbox {
            store,
            transport,
            connectivity,
            limit,
            draining: Mutex::new(()),
            status_tx,
        }
    }

    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    /// Append a mutation to the queue as a new pending item.
    ///
    /// `error` records why the mutation is being queued, if known.
    pub fn enqueue(&self, mutation: &Mutation, error: Option<String>) -> Result<ItemId> {
        let item = QueueItem::from_mutation(mutation, error, Utc::now())?;
        let id = item.id.clone();
        let limit = self.limit;

        let mut pending = Some(item);
        let mut evicted = Vec::new();
        let mut status = QueueStatus::default();
        self.store.update(&mut |items| {
            if let Some(item) = pending.take() {
                evicted = limit.push(items, item)?;
            }
            status = QueueStatus::from_items(items);
            Ok(())
        })?;

        for item in &evicted {
            tracing::warn!(id = %item.id, url = %item.url, "queue full, dropped oldest item");
        }
        tracing::debug!(%id, method = %mutation.method, url = %mutation.url, "enqueued");
        self.publish(status);
        Ok(id)
    }

    /// Attempt a mutation immediately, queueing it only if the failure is
    /// worth retrying.
    ///
    /// While offline no request is made and the mutation is queued directly.
    /// Definitive client errors are returned to the caller and not queued.
    pub async fn send(&self, mutation: &Mutation) -> Result<SendResult> {
        if !self.connectivity.is_online() {
            let id = self.enqueue(mutation, Some(OFFLINE_REASON.to_string()))?;
            return Ok(SendResult {
                ok: false,
                queued: true,
                response: None,
                id: Some(id),
            });
        }

        let request = Request::from_mutation(mutation)?;
        let result = self.transport.deliver(request).await;
        let outcome = outcome_of(&result);
        let online = self.connectivity.is_online();

        match result {
            Err(e) => {
                tracing::debug!(url = %mutation.url, "send failed, queueing: {}", e);
                let id = self.enqueue(mutation, Some(outcome.reason()))?;
                Ok(SendResult {
                    ok: false,
                    queued: true,
                    response: None,
                    id: Some(id),
                })
            }
            // A delivered mutation is never queued again, even if the state
            // went offline while the request was in flight.
            Ok(response) if !response.ok() && should_queue(&outcome, online) => {
                tracing::debug!(url = %mutation.url, status = response.status, "send failed, queueing");
                let id = self.enqueue(mutation, Some(outcome.reason()))?;
                Ok(SendResult {
                    ok: false,
                    queued: true,
                    response: Some(response),
                    id: Some(id),
                })
            }
            Ok(response) => Ok(SendResult {
                ok: response.ok(),
                queued: false,
                response: Some(response),
                id: None,
            }),
        }
    }

    /// Run one drain cycle.
    ///
    /// Delivery failures are folded into item state and the summary; `Err`
    /// is returned only when the local store cannot be read or written.
    pub async fn drain(&self) -> Result<DrainSummary> {
        let Ok(_guard) = self.draining.try_lock() else {
            tracing::debug!("drain already in progress, skipping");
            return Ok(DrainSummary::skipped(&self.status()?));
        };
        if !self.connectivity.is_online() {
            tracing::debug!("offline, skipping drain");
            return Ok(DrainSummary::skipped(&self.status()?));
        }
        let Some(_claim) = self.store.try_claim_drain()? else {
            tracing::debug!("queue is being drained elsewhere, skipping");
            return Ok(DrainSummary::skipped(&self.status()?));
        };

        let items = self.store.load()?;
        let mut changes: HashMap<ItemId, Change> = HashMap::new();
        let mut processed = 0;
        let mut errors = 0;

        for item in items.iter().filter(|item| !item.is_error()) {
            let result = self.transport.deliver(Request::from(item)).await;
            let outcome: Outcome = outcome_of(&result);
            tracing::debug!(id = %item.id, url = %item.url, %outcome, "delivery attempt");

            match classify(&outcome) {
                Disposition::Success => {
                    processed += 1;
                    changes.insert(item.id.clone(), Change::Delivered);
                }
                Disposition::DefinitiveFailure { reason } => {
                    errors += 1;
                    tracing::warn!(id = %item.id, url = %item.url, "rejected ({}), marking as error", reason);
                    changes.insert(item.id.clone(), Change::Rejected(reason));
                }
                Disposition::RetryableFailure { reason } => {
                    errors += 1;
                    tracing::warn!(id = %item.id, url = %item.url, "retryable failure ({}), halting drain", reason);
                    changes.insert(item.id.clone(), Change::Retry(reason));
                    break;
                }
            }
        }

        let mut status = QueueStatus::default();
        self.store.update(&mut |current| {
            current.retain_mut(|item| match changes.get(&item.id) {
                Some(Change::Delivered) => false,
                Some(Change::Rejected(reason)) => {
                    item.mark_rejected(reason.clone());
                    true
                }
                Some(Change::Retry(reason)) => {
                    item.record_retry(reason.clone());
                    true
                }
                None => true,
            });
            status = QueueStatus::from_items(current);
            Ok(())
        })?;

        if processed > 0 || errors > 0 {
            tracing::info!(processed, errors, remaining = status.total, "drain cycle finished");
        }
        self.publish(status);

        Ok(DrainSummary {
            processed,
            remaining: status.total,
            error: errors,
        })
    }

    /// Reset every `error` item to `pending`, keeping `attempts` and
    /// `lastError`. Returns the number of items reset.
    pub fn reset_failed(&self) -> Result<usize> {
        let mut reset = 0;
        let mut status = QueueStatus::default();
        self.store.update(&mut |items| {
            reset = 0;
            for item in items.iter_mut().filter(|item| item.is_error()) {
                item.reset();
                reset += 1;
            }
            status = QueueStatus::from_items(items);
            Ok(())
        })?;
        if reset > 0 {
            tracing::info!(reset, "reset failed items to pending");
        }
        self.publish(status);
        Ok(reset)
    }

    /// Reset failed items and immediately run a drain cycle.
    pub async fn retry_failed(&self) -> Result<DrainSummary> {
        self.reset_failed()?;
        self.drain().await
    }

    /// Remove every item. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        self.store.update(&mut |items| {
            removed = items.len();
            items.clear();
            Ok(())
        })?;
        tracing::info!(removed, "queue cleared");
        self.publish(QueueStatus::default());
        Ok(removed)
    }

    /// Remove a single item by id.
    pub fn remove(&self, id: &ItemId) -> Result<QueueItem> {
        let mut removed = None;
        let mut status = QueueStatus::default();
        self.store.update(&mut |items| {
            if let Some(pos) = items.iter().position(|item| &item.id == id) {
                removed = Some(items.remove(pos));
            }
            status = QueueStatus::from_items(items);
            Ok(())
        })?;
        let item = removed.ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
        tracing::info!(id = %item.id, "removed item");
        self.publish(status);
        Ok(item)
    }

    /// All queued items, in delivery order.
    pub fn items(&self) -> Result<Vec<QueueItem>> {
        Ok(self.store.load()?)
    }

    /// Counts computed from a fresh read of the store.
    pub fn status(&self) -> Result<QueueStatus> {
        Ok(QueueStatus::from_items(&self.store.load()?))
    }

    /// Counts plus connectivity, from a fresh read.
    pub fn snapshot(&self) -> Result<StatusSnapshot> {
        Ok(StatusSnapshot {
            status: self.status()?,
            online: self.connectivity.is_online(),
        })
    }

    /// Recompute the snapshot and notify subscribers if it changed.
    ///
    /// Picks up changes made by other processes sharing the store.
    pub fn refresh(&self) -> Result<StatusSnapshot> {
        let status = self.status()?;
        self.publish(status);
        Ok(*self.status_tx.borrow())
    }

    /// Receive a snapshot after every change to the queue or connectivity.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_tx.subscribe()
    }

    fn publish(&self, status: QueueStatus) {
        let snapshot = StatusSnapshot {
            status,
            online: self.connectivity.is_online(),
        };
        self.status_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
