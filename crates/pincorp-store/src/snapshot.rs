//! # Snapshots
//!
//! JSON persistence of the collections, supplied to the store by the
//! caller through [`StoreConfig`](crate::StoreConfig).
//!
//! ## How Snapshots Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Process                                   │
//! │                                                                         │
//! │  Store::open                                                            │
//! │       │                                                                 │
//! │       ├── file missing? ──► empty collections                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse { version, savedAt, data }                                       │
//! │       │                                                                 │
//! │       ├── version != SNAPSHOT_VERSION ──► UnsupportedSnapshot           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  collections                                                            │
//! │                                                                         │
//! │  Store::transaction (autosave)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write pincorp.json.tmp ──► rename over pincorp.json                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Format Changes
//! Bump [`SNAPSHOT_VERSION`] whenever a change to the domain types makes
//! older files unreadable.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::Collections;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile<T> {
    version: u32,
    saved_at: DateTime<Utc>,
    data: T,
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads the collections from `path`. A missing file yields empty collections.
pub fn load(path: &Path) -> StoreResult<Collections> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot yet, starting empty");
            return Ok(Collections::default());
        }
        Err(e) => return Err(io_error(path, e)),
    };

    let file: SnapshotFile<Collections> = serde_json::from_str(&raw)?;
    if file.version != SNAPSHOT_VERSION {
        return Err(StoreError::UnsupportedSnapshot {
            found: file.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    debug!(path = %path.display(), saved_at = %file.saved_at, "Snapshot loaded");
    Ok(file.data)
}

/// Writes the collections to `path`, replacing it atomically.
pub fn save(path: &Path, collections: &Collections) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        data: collections,
    };
    let json = serde_json::to_string_pretty(&file)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;

    debug!(path = %path.display(), "Snapshot saved");
    Ok(())
}
