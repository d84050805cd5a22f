//! Ledger Store — durable JSON snapshot of all accounts
//!
//! The whole dataset is one JSON document (`{"accounts": [...]}`)
//! loaded and rewritten in full on every mutation. Saves are atomic:
//! write to a temp file in the same directory, fsync, rename over the
//! target, so a partial write is never observable by a later load.
//!
//! A single mutex serializes every load-mutate-save cycle; see
//! [`JsonStore::transaction`]. This is what prevents two concurrent
//! deposits from both loading the pre-mutation balance and silently
//! losing one update.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use types::account::Account;
use types::errors::{LedgerError, StorageError};

/// Full in-memory materialization of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
}

impl Snapshot {
    /// Create an empty dataset.
    pub fn empty() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }
}

/// JSON-file-backed store with a single-writer lock.
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full dataset, initializing an empty one on first use.
    pub fn load(&self) -> Result<Snapshot, LedgerError> {
        if !self.path.exists() {
            let empty = Snapshot::empty();
            self.save(&empty)?;
            return Ok(empty);
        }
        let data = fs::read_to_string(&self.path).map_err(StorageError::from)?;
        let snapshot = serde_json::from_str(&data).map_err(StorageError::from)?;
        Ok(snapshot)
    }

    /// Atomically replace the durable dataset with the given snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StorageError::from)?;
            }
        }

        let data = serde_json::to_string_pretty(snapshot).map_err(StorageError::from)?;

        // Atomic write: write to tmp, fsync, rename
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path).map_err(StorageError::from)?;
            file.write_all(data.as_bytes()).map_err(StorageError::from)?;
            file.sync_all().map_err(StorageError::from)?;
        }
        fs::rename(&tmp_path, &self.path).map_err(StorageError::from)?;
        Ok(())
    }

    /// Run one serialized load-mutate-save cycle.
    ///
    /// The write lock is held for the whole cycle. If the closure fails,
    /// nothing is saved and the durable dataset is untouched.
    pub fn transaction<T>(
        &self,
        mutate: impl FnOnce(&mut Snapshot) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut snapshot = self.load()?;
        let out = mutate(&mut snapshot)?;
        self.save(&snapshot)?;
        Ok(out)
    }

    /// Run a read-only closure against a freshly loaded snapshot.
    ///
    /// Takes the same lock so reads never observe a half-written cycle.
    pub fn read<T>(
        &self,
        inspect: impl FnOnce(&Snapshot) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.load()?;
        inspect(&snapshot)
    }
}
