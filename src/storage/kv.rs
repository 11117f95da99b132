//! Durable key-value store
//!
//! A single JSON object file mapping string keys to JSON values. Every write
//! rewrites the whole file atomically. The store has one writer, so there is
//! no locking.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use super::file_io::{read_json, write_json_atomic};
use crate::error::BudgetPilotResult;

type Entries = BTreeMap<String, Value>;

/// File-backed key-value store
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value; an unreadable store behaves as empty
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().remove(key)
    }

    pub fn set(&self, key: &str, value: Value) -> BudgetPilotResult<()> {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value);
        write_json_atomic(&self.path, &entries)
    }

    fn entries(&self) -> Entries {
        read_json(&self.path).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "local store unreadable, treating as empty");
            Entries::new()
        })
    }
}
