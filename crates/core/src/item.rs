// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue item types.
//!
//! A [`QueueItem`] is one durable unit of outgoing work: a pre-serialized HTTP
//! mutation plus the delivery bookkeeping the drain engine maintains
//! (`attempts`, `lastError`, `status`). Callers describe work with a
//! [`Mutation`]; the body is serialized when the item is built so that later
//! changes to the caller's data cannot alter a queued request.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Header name to value mapping, kept sorted for stable persistence.
pub type Headers = BTreeMap<String, String>;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers applied when a mutation does not specify any.
pub fn default_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
    headers
}

/// Unique identifier of a queued item.
///
/// Format: `{unix-millis}-{8 hex chars}`. The millisecond prefix keeps ids
/// roughly time-ordered; the random suffix avoids collisions between items
/// enqueued within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh id for an item created at `now`.
    pub fn generate(now: &DateTime<Utc>) -> Self {
        let suffix: u32 = rand::random();
        ItemId(format!("{}-{:08x}", now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

/// HTTP verb of a queued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// Delivery status of a queued item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Eligible for delivery on the next drain cycle.
    #[default]
    Pending,
    /// Rejected by the server with a definitive client error. Kept for
    /// visibility; only an explicit retry makes it eligible again.
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Error => "error",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "error" => Ok(ItemStatus::Error),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A caller's description of an HTTP mutation, before it is queued or sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub url: String,
    pub method: Method,
    /// Structured payload; serialized to JSON when the item is built.
    pub body: Option<serde_json::Value>,
    /// Explicit headers. `None` means [`default_headers`].
    pub headers: Option<Headers>,
    /// Tag naming the feature that originated the mutation.
    pub feature: Option<String>,
}

impl Mutation {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Mutation {
            url: url.into(),
            method,
            body: None,
            headers: None,
            feature: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header. The first call replaces the default JSON content type.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Headers that will be sent, with the JSON default applied.
    pub fn effective_headers(&self) -> Headers {
        self.headers.clone().unwrap_or_else(default_headers)
    }

    /// Serialize the body as it will appear on the wire.
    pub fn serialized_body(&self) -> Result<Option<String>> {
        match &self.body {
            Some(value) => Ok(Some(serde_json::to_string(value)?)),
            None => Ok(None),
        }
    }
}

/// One durable unit of outgoing work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: ItemId,
    pub url: String,
    pub method: Method,
    #[serde(default = "default_headers")]
    pub headers: Headers,
    /// Pre-serialized payload.
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Failed retryable delivery attempts so far. Never decreases.
    #[serde(default)]
    pub attempts: u32,
    /// Last failure: a network message or `status:<code>`.
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

impl QueueItem {
    /// Build a pending item from a mutation, optionally recording the failure
    /// that caused it to be queued.
    pub fn from_mutation(
        mutation: &Mutation,
        error: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(QueueItem {
            id: ItemId::generate(&now),
            url: mutation.url.clone(),
            method: mutation.method,
            headers: mutation.effective_headers(),
            body: mutation.serialized_body()?,
            created_at: now,
            attempts: 0,
            last_error: error,
            status: ItemStatus::Pending,
            feature: mutation.feature.clone(),
        })
    }

    pub fn is_error(&self) -> bool {
        self.status == ItemStatus::Error
    }

    /// Record a retryable failure: count the attempt and keep the item pending.
    pub fn record_retry(&mut self, reason: impl Into<String>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(reason.into());
        self.status = ItemStatus::Pending;
    }

    /// Record a definitive rejection. `attempts` is left unchanged.
    pub fn mark_rejected(&mut self, reason: impl Into<String>) {
        self.last_error = Some(reason.into());
        self.status = ItemStatus::Error;
    }

    /// Make a rejected item eligible for delivery again, keeping its history.
    pub fn reset(&mut self) {
        self.status = ItemStatus::Pending;
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
