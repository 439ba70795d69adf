//! Persistence port for the timer snapshot.
//!
//! Only `{ sessionCount, settings }` is stored, under
//! [`defaults::STORAGE_KEY`], wrapped in a versioned envelope:
//!
//! ```json
//! {"state":{"sessionCount":3,"settings":{"workDuration":1500,...}},"version":0}
//! ```
//!
//! Loading never fails: missing or unreadable records yield the defaults, and
//! settings outside the accepted ranges are reset field by field.

use crate::{defaults, PersistedTimer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum StorageError {
    /// No storage backend could be reached (e.g. localStorage disabled).
    Unavailable(String),
    Backend(String),
    Serialize(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            StorageError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Failed to encode snapshot: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Key-value backend the timer snapshot is loaded from and saved to.
pub trait SnapshotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

fn js_error_message(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Browser `window.localStorage`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocalStorage;

impl LocalStorage {
    fn backend(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_error_message(e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl SnapshotStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(js_error_message(e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(js_error_message(e)))
    }
}

/// In-process storage, used where no browser is around (tests, previews).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedTimer,
    version: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Envelope {
        state: PersistedTimer,
        #[serde(default)]
        version: u32,
    },
    Bare(PersistedTimer),
}

enum DecodeError {
    Malformed(String),
    Version(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(msg) => write!(f, "{}", msg),
            DecodeError::Version(version) => write!(
                f,
                "unsupported snapshot version {} (expected {})",
                version,
                defaults::SNAPSHOT_VERSION
            ),
        }
    }
}

fn decode_record(raw: &str) -> Result<PersistedTimer, DecodeError> {
    let record: StoredRecord =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let mut snapshot = match record {
        StoredRecord::Envelope { state, version } if version == defaults::SNAPSHOT_VERSION => {
            state
        }
        StoredRecord::Envelope { version, .. } => return Err(DecodeError::Version(version)),
        StoredRecord::Bare(state) => state,
    };

    let replaced = snapshot.settings.sanitize();
    if !replaced.is_empty() {
        warn!(
            "Stored settings out of range, using defaults for: {}",
            replaced.join(", ")
        );
    }
    Ok(snapshot)
}

/// Where a restored snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Stored,
    Missing,
    /// Storage failed or the record could not be parsed.
    Unreadable,
    /// The record was written with another snapshot version and was not read.
    ForeignVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub snapshot: PersistedTimer,
    pub source: RecordSource,
}

impl Restored {
    fn fallback(source: RecordSource) -> Self {
        Self {
            snapshot: PersistedTimer::default(),
            source,
        }
    }

    /// A record from another version is kept until the user changes something.
    pub fn preserve_record(&self) -> bool {
        self.source == RecordSource::ForeignVersion
    }
}

/// Load the persisted timer subset and report where it came from.
pub fn restore_snapshot(storage: &dyn SnapshotStorage) -> Restored {
    let raw = match storage.read(defaults::STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored timer record, using defaults");
            return Restored::fallback(RecordSource::Missing);
        }
        Err(e) => {
            warn!("{}; using default settings", e);
            return Restored::fallback(RecordSource::Unreadable);
        }
    };

    match decode_record(&raw) {
        Ok(snapshot) => {
            debug!(
                "Restored timer record: {} sessions, {:?}",
                snapshot.session_count, snapshot.settings
            );
            Restored {
                snapshot,
                source: RecordSource::Stored,
            }
        }
        Err(e) => {
            warn!("Ignoring stored timer record ({}); using default settings", e);
            let source = match e {
                DecodeError::Version(_) => RecordSource::ForeignVersion,
                DecodeError::Malformed(_) => RecordSource::Unreadable,
            };
            Restored::fallback(source)
        }
    }
}

/// Load the persisted timer subset, falling back to defaults on any problem.
pub fn load_snapshot(storage: &dyn SnapshotStorage) -> PersistedTimer {
    restore_snapshot(storage).snapshot
}

pub fn save_snapshot(
    storage: &dyn SnapshotStorage,
    snapshot: &PersistedTimer,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(&EnvelopeRef {
        state: snapshot,
        version: defaults::SNAPSHOT_VERSION,
    })
    .map_err(|e| StorageError::Serialize(e.to_string()))?;
    storage.write(defaults::STORAGE_KEY, &json)
}
