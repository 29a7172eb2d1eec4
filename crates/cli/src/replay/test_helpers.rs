// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for replay module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use outbox_core::{MemoryStore, Method, Mutation, QueueLimit, Store};

use super::connectivity::{Connectivity, Probe};
use super::outbox::Outbox;
use super::transport::{Request, Response, Transport, TransportError, TransportResult};

/// A canned reply for the mock transport.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Network(&'static str),
}

/// Mock transport for testing without real sockets.
///
/// Replies are scripted per URL and consumed in order; once a URL's script is
/// exhausted it answers 200. Every delivered request is recorded.
#[derive(Clone, Default)]
pub struct MockTransport {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    delivered: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for `url`.
    pub fn script(&self, url: &str, replies: &[Reply]) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .extend(replies.iter().cloned());
    }

    /// All requests delivered so far, in order.
    pub fn delivered(&self) -> Vec<Request> {
        self.delivered.lock().unwrap().clone()
    }

    /// URLs of delivered requests, in order.
    pub fn delivered_urls(&self) -> Vec<String> {
        self.delivered().into_iter().map(|r| r.url).collect()
    }
}

impl Transport for MockTransport {
    fn deliver(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + '_>> {
        Box::pin(async move {
            let reply = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&request.url)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Reply::Status(200));
            self.delivered.lock().unwrap().push(request);
            match reply {
                Reply::Status(status) => Ok(Response::new(status, "")),
                Reply::Network(message) => Err(TransportError::ConnectionFailed(message.into())),
            }
        })
    }
}

/// Probe whose answer is flipped by the test.
#[derive(Default)]
pub struct ScriptedProbe {
    online: AtomicBool,
    checks: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(online: bool) -> Self {
        ScriptedProbe {
            online: AtomicBool::new(online),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Probe for ScriptedProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        let online = self.online.load(Ordering::SeqCst);
        Box::pin(async move { online })
    }
}

/// A POST mutation to `url` with a small JSON body.
pub fn post(url: &str) -> Mutation {
    Mutation::new(Method::Post, url).with_body(serde_json::json!({ "url": url }))
}

/// Test fixture bundling an outbox with handles on its collaborators.
pub struct Fixture {
    pub outbox: Arc<Outbox>,
    pub store: Arc<MemoryStore>,
    pub transport: MockTransport,
    pub connectivity: Arc<Connectivity>,
}

impl Fixture {
    pub fn new(online: bool) -> Self {
        Self::with_limit(online, QueueLimit::unbounded())
    }

    pub fn with_limit(online: bool, limit: QueueLimit) -> Self {
        let store = Arc::new(MemoryStore::new());
        let transport = MockTransport::new();
        let connectivity = Arc::new(Connectivity::new(online));
        let outbox = Arc::new(Outbox::new(
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::new(transport.clone()),
            Arc::clone(&connectivity),
            limit,
        ));
        Fixture {
            outbox,
            store,
            transport,
            connectivity,
        }
    }

    /// Enqueue one POST per URL, in order.
    pub fn enqueue_all(&self, urls: &[&str]) {
        for url in urls {
            self.outbox.enqueue(&post(url), None).unwrap();
        }
    }

    /// URLs still in the store, in order.
    pub fn queued_urls(&self) -> Vec<String> {
        self.store
            .load()
            .unwrap()
            .into_iter()
            .map(|item| item.url)
            .collect()
    }
}
