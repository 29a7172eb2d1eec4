// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for queue items.
//!
//! The queue is persisted as a single JSON document:
//!
//! ```json
//! { "version": 1, "items": [ ... ] }
//! ```
//!
//! A bare JSON array (the unversioned layout) is read as version 0 and
//! rewritten in the current layout on the next write. Documents from a newer
//! version are refused instead of being silently truncated.
//!
//! [`FileStore`] serializes writers across processes with an exclusive lock on
//! a sidecar `.lock` file and replaces the document atomically (write to a
//! temporary file, fsync, rename), so readers never observe a torn write.
//! [`Store::update`] runs a read-modify-write under that lock; callers that
//! change individual items should use it instead of `load` + `save` so that
//! concurrent writers do not lose each other's updates.
//!
//! Draining is claimed separately through [`Store::try_claim_drain`]: a
//! `FileStore` takes a non-blocking exclusive lock on a second sidecar
//! (`queue.drain.lock`) that is held for a whole drain cycle, so at most one
//! process replays a given queue at a time.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::item::QueueItem;

/// Current on-disk layout version.
pub const SCHEMA_VERSION: u64 = 1;

/// Persistence for the ordered item sequence.
pub trait Store: Send + Sync {
    /// Read the full ordered sequence.
    fn load(&self) -> Result<Vec<QueueItem>>;

    /// Replace the full sequence.
    fn save(&self, items: &[QueueItem]) -> Result<()>;

    /// Atomically read, modify, and write the sequence.
    ///
    /// Nothing is written if `apply` returns an error.
    fn update(&self, apply: &mut dyn FnMut(&mut Vec<QueueItem>) -> Result<()>) -> Result<()>;

    /// Claim the right to drain this queue without waiting.
    ///
    /// Returns `None` if another holder already has it. The claim is released
    /// when the returned guard is dropped. Stores that are not shared between
    /// processes grant it unconditionally.
    fn try_claim_drain(&self) -> Result<Option<DrainClaim>> {
        Ok(Some(DrainClaim { _file: None }))
    }
}

/// Held for the duration of a drain cycle.
#[derive(Debug)]
pub struct DrainClaim {
    _file: Option<File>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    items: &'a [QueueItem],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Vec<QueueItem>,
}

/// Decode a persisted queue document, migrating older layouts.
pub fn decode(data: &str) -> Result<Vec<QueueItem>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(data)?;
    match value {
        Value::Array(_) => {
            tracing::debug!("reading unversioned queue layout");
            Ok(serde_json::from_value(value)?)
        }
        Value::Object(ref fields) => {
            let version = fields
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| Error::CorruptedData("missing version field".to_string()))?;
            if version > SCHEMA_VERSION {
                return Err(Error::UnsupportedVersion {
                    found: version,
                    supported: SCHEMA_VERSION,
                });
            }
            let envelope: Envelope = serde_json::from_value(value)?;
            Ok(envelope.items)
        }
        _ => Err(Error::CorruptedData(
            "expected a JSON object or array".to_string(),
        )),
    }
}

/// Encode items in the current layout.
pub fn encode(items: &[QueueItem]) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        version: SCHEMA_VERSION,
        items,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// File-backed store shared safely between processes.
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    drain_lock_path: PathBuf,
}

impl FileStore {
    /// Create a store persisting to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        let drain_lock_path = path.with_extension("drain.lock");
        FileStore {
            path,
            lock_path,
            drain_lock_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, exclusive: bool) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| Error::Lock(format!("{}: {}", self.lock_path.display(), e)))?;
        Ok(file)
    }

    fn read_unlocked(&self) -> Result<Vec<QueueItem>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => decode(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_unlocked(&self, items: &[QueueItem]) -> Result<()> {
        let data = encode(items)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let mut file = File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<QueueItem>> {
        let _guard = self.lock(false)?;
        self.read_unlocked()
    }

    fn save(&self, items: &[QueueItem]) -> Result<()> {
        let _guard = self.lock(true)?;
        self.write_unlocked(items)
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Vec<QueueItem>) -> Result<()>) -> Result<()> {
        let _guard = self.lock(true)?;
        let mut items = self.read_unlocked()?;
        apply(&mut items)?;
        self.write_unlocked(&items)
    }

    fn try_claim_drain(&self) -> Result<Option<DrainClaim>> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.drain_lock_path)?;
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Some(DrainClaim { _file: Some(file) })),
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
            Err(e) => Err(Error::Lock(format!(
                "{}: {}",
                self.drain_lock_path.display(),
                e
            ))),
        }
    }
}

/// In-process store, used by tests and embedders that do not need durability.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<QueueItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<QueueItem>) -> Self {
        MemoryStore {
            items: Mutex::new(items),
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<QueueItem>>> {
        self.items
            .lock()
            .map_err(|_| Error::Lock("memory store poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<QueueItem>> {
        Ok(self.guard()?.clone())
    }

    fn save(&self, items: &[QueueItem]) -> Result<()> {
        *self.guard()? = items.to_vec();
        Ok(())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Vec<QueueItem>) -> Result<()>) -> Result<()> {
        let mut guard = self.guard()?;
        let mut items = guard.clone();
        apply(&mut items)?;
        *guard = items;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
