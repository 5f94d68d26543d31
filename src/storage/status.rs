//! Status snapshot store

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{write_atomic, StoreError};
use crate::types::{StatusSnapshot, StatusView};

/// Single-value JSON file holding the latest [`StatusSnapshot`].
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current snapshot; `Ok(None)` if none was ever written.
    pub fn load(&self) -> Result<Option<StatusSnapshot>, StoreError> {
        self.read()
    }

    /// Read the snapshot for display, accepting any status string.
    pub fn load_view(&self) -> Result<Option<StatusView>, StoreError> {
        self.read()
    }

    fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Overwrite the snapshot (pretty-printed JSON).
    pub fn save(&self, snapshot: &StatusSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        write_atomic(&self.path, &json).map_err(|e| StoreError::io(&self.path, e))
    }
}
