use crate::config::{FileFormat, StoreConfig};
use crate::error::{ListingDbError, Result};
use crate::file;
use crate::patch::RecordPatch;
use crate::query::SearchCriteria;
use crate::record::{NewRecord, Record, RecordKey};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// What happened when the store read its backing file at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No backing file yet; the store starts empty.
    Missing,
    /// The file was read successfully.
    Loaded { records: usize },
    /// The file exists but could not be read or parsed; the store starts empty.
    Recovered { error: String },
}

/// The record store.
/// Holds the collection in memory, in insertion order, and rewrites the whole
/// backing file after every successful mutation. A failed write rolls the
/// in-memory change back, so memory and disk agree whenever a call returns.
pub struct Store {
    config: StoreConfig,
    path: PathBuf,
    format: FileFormat,
    records: Vec<Record>,
    load_outcome: LoadOutcome,
}

impl Store {
    /// Open a store for the configured backing file.
    /// An unreadable file is logged and treated as empty; see [`Store::load_outcome`].
    pub fn open(config: StoreConfig) -> Result<Self> {
        Self::open_with(config, false)
    }

    /// Open a store, failing instead of starting empty when the backing file
    /// exists but cannot be read.
    pub fn open_strict(config: StoreConfig) -> Result<Self> {
        Self::open_with(config, true)
    }

    fn open_with(config: StoreConfig, strict: bool) -> Result<Self> {
        let path = config.resolved_path()?;
        let format = config.format();

        let (records, load_outcome) = match file::read_records(&path, format) {
            Ok(None) => (Vec::new(), LoadOutcome::Missing),
            Ok(Some(records)) => {
                let records = dedupe_keys(records, &path);
                let count = records.len();
                (records, LoadOutcome::Loaded { records: count })
            }
            Err(e) if strict => {
                return Err(ListingDbError::Load {
                    path,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                log::warn!("Failed to load {}, starting empty: {e}", path.display());
                (
                    Vec::new(),
                    LoadOutcome::Recovered {
                        error: e.to_string(),
                    },
                )
            }
        };

        log::debug!("Opened store at {} ({:?})", path.display(), load_outcome);

        Ok(Store {
            config,
            path,
            format,
            records,
            load_outcome,
        })
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Every record, in insertion order.
    pub fn get_all(&self) -> &[Record] {
        &self.records
    }

    pub fn get_by_key(&self, key: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.key.as_str() == key)
    }

    /// Records matching every field named in `criteria`, in collection order.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&Record> {
        self.records.iter().filter(|r| criteria.matches(r)).collect()
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Insert a new record under a generated key.
    pub fn create(&mut self, new: NewRecord) -> Result<Record> {
        let key = self.next_key();
        self.insert(key, new)
    }

    /// Insert a new record under a caller-chosen key. A key that is already
    /// present is rejected and nothing is written.
    pub fn create_with_key(
        &mut self,
        key: impl Into<RecordKey>,
        new: NewRecord,
    ) -> Result<Record> {
        let key = key.into();
        if self.position(key.as_str()).is_some() {
            return Err(ListingDbError::KeyConflict {
                key: key.to_string(),
            });
        }
        self.insert(key, new)
    }

    /// Merge `patch` onto the record with `key` and refresh its `updated_at`.
    /// Returns `Ok(None)` if no record has that key.
    pub fn update(&mut self, key: &str, patch: &RecordPatch) -> Result<Option<Record>> {
        let index = match self.position(key) {
            Some(i) => i,
            None => return Ok(None),
        };

        let previous = self.records[index].clone();
        let record = &mut self.records[index];
        patch.apply_to(record);
        record.updated_at = next_timestamp(previous.updated_at);
        let updated = record.clone();

        if let Err(e) = updated.validate().and_then(|_| self.persist()) {
            self.records[index] = previous;
            return Err(e);
        }
        Ok(Some(updated))
    }

    /// Remove the record with `key`. Returns `Ok(false)` without touching the
    /// backing file if there was nothing to remove.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let index = match self.position(key) {
            Some(i) => i,
            None => return Ok(false),
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Summary of the store: backing file, record count, and counts per type.
    pub fn status(&self) -> serde_json::Value {
        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.records {
            *by_type
                .entry(record.property_type.as_str().to_string())
                .or_default() += 1;
        }

        serde_json::json!({
            "path": self.path.display().to_string(),
            "format": self.format.name(),
            "count": self.records.len(),
            "by_type": by_type,
        })
    }

    fn insert(&mut self, key: RecordKey, new: NewRecord) -> Result<Record> {
        let record = Record::from_new(key, Utc::now(), new);
        record.validate()?;
        self.records.push(record.clone());

        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(record)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key.as_str() == key)
    }

    fn next_key(&self) -> RecordKey {
        loop {
            let key = RecordKey::new(self.config.key_strategy.generate());
            if self.position(key.as_str()).is_none() {
                return key;
            }
        }
    }

    fn persist(&self) -> Result<()> {
        file::write_records(&self.path, self.format, &self.records).map_err(|e| {
            log::error!("Failed to save {}: {e}", self.path.display());
            e
        })
    }
}

/// The current time, or just after `previous` if the clock has not moved past it.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

/// Keep the first record for each key; later duplicates are dropped.
fn dedupe_keys(records: Vec<Record>, path: &Path) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.key.clone());
            if !fresh {
                log::warn!(
                    "Dropping record with duplicate key '{}' from {}",
                    record.key,
                    path.display()
                );
            }
            fresh
        })
        .collect()
}
