// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity observer.
//!
//! Holds the current online/offline state in a `watch` channel so that the
//! runner can react to transitions and the queue can check the state cheaply
//! before every drain. Going offline never touches queued items; it only
//! suspends draining.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;

/// Current connectivity state with change notification.
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Connectivity { tx }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Record the observed state. Returns true if it changed; subscribers are
    /// only woken on an actual transition.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Source of connectivity observations.
pub trait Probe: Send + Sync {
    /// Returns true if the remote service is reachable.
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probe that treats any HTTP response, whatever its status, as online.
///
/// Only a transport failure (DNS, refused, timeout) counts as offline: a
/// server answering 500 is reachable, and its items should be retried by the
/// drain engine rather than parked.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpProbe {
            client,
            url: url.into(),
        })
    }
}

impl Probe for HttpProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            match self.client.head(&self.url).send().await {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(url = %self.url, "probe failed: {}", e);
                    false
                }
            }
        })
    }
}

/// Probe used when no probe URL is configured: always reports online and
/// lets delivery failures drive retries.
pub struct AssumeOnline;

impl Probe for AssumeOnline {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async { true })
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
