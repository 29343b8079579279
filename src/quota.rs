//! Daily generation quota.
//!
//! Usage is a soft deterrent kept on the local device, so every storage fault
//! fails open: reads that go wrong permit generation and writes that go wrong
//! are logged and dropped.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Generations allowed per calendar day.
pub const DAILY_LIMIT: u32 = 10;

/// Name of the persisted usage record.
pub const USAGE_KEY: &str = "proheadshot_daily_usage";

/// Today's local calendar date as a record key (`YYYY-MM-DD`).
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Key-value persistence for the usage record.
pub trait QuotaStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a description of the fault if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a description of the fault if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Persisted usage for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Calendar day the count belongs to.
    pub date: String,
    /// Attempts made on that day.
    pub count: u32,
}

/// Enforces [`DAILY_LIMIT`] over an injected [`QuotaStore`].
pub struct QuotaTracker<S> {
    store: S,
    limit: u32,
}

impl<S: QuotaStore> QuotaTracker<S> {
    /// Track usage in `store` with the standard daily limit.
    pub const fn new(store: S) -> Self {
        Self { store, limit: DAILY_LIMIT }
    }

    /// The daily limit.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether another attempt is allowed on `today`.
    ///
    /// Missing, stale, unreadable, or corrupt records all permit generation.
    pub fn may_generate(&self, today: &str) -> bool {
        self.used_today(today) < self.limit
    }

    /// Attempts already charged on `today`.
    pub fn used_today(&self, today: &str) -> u32 {
        match self.read() {
            Ok(Some(record)) if record.date == today => record.count,
            Ok(_) => 0,
            Err(e) => {
                warn!("Error reading usage data: {e}");
                0
            }
        }
    }

    /// Charge one attempt to `today`, starting a fresh count on a new day.
    pub fn record_attempt(&self, today: &str) {
        let count = match self.read() {
            Ok(Some(record)) if record.date == today => record.count.saturating_add(1),
            Ok(_) => 1,
            Err(e) => {
                warn!("Error reading usage data, restarting count: {e}");
                1
            }
        };
        let record = UsageRecord { date: today.to_string(), count };
        let result = serde_json::to_string(&record)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(USAGE_KEY, &json));
        match result {
            Ok(()) => debug!("Usage for {today}: {count}/{}", self.limit),
            Err(e) => warn!("Failed to save usage: {e}"),
        }
    }

    fn read(&self) -> Result<Option<UsageRecord>, String> {
        let Some(raw) = self.store.get(USAGE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| format!("corrupt usage record: {e}"))
    }
}

/// In-memory store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    values: Mutex<HashMap<String, String>>,
}

impl QuotaStore for MemoryQuotaStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let guard = self.values.lock().map_err(|e| format!("store lock poisoned: {e}"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut guard = self.values.lock().map_err(|e| format!("store lock poisoned: {e}"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file mapping keys to string values.
///
/// Every read reloads the file; every write merges into what is on disk.
#[derive(Debug, Clone)]
pub struct FileQuotaStore {
    path: PathBuf,
}

impl FileQuotaStore {
    /// Use the JSON file at `path`, created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Map<String, Value>, String> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?;
        match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(format!("{} does not hold a JSON object", self.path.display())),
            Err(e) => Err(format!("Failed to parse {}: {e}", self.path.display())),
        }
    }
}

impl QuotaStore for FileQuotaStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let map = self.load()?;
        match map.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        // A corrupt file is replaced rather than blocking the write.
        let mut map = self.load().unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {}: {e}", self.path.display()))
    }
}
