//! Offline-first sync engine.
//!
//! # Responsibility
//! - Single place deciding where record data comes from and in what order
//!   stores are touched: cache, then durable local store, then remote.
//! - Apply optimistic local mutations that survive remote failure.
//!
//! # Invariants
//! - No two records share one id within an owner's loaded collection.
//! - Cache and durable local store are updated before any remote call, so
//!   sequential callers read their own writes regardless of remote outcome.
//! - Remote failure never rolls back a local write and never fails a read.
//!
//! # Blocking
//! - Every `LocalStore` and `RemoteStore` call below may block on I/O;
//!   callers that need responsiveness run the engine off their UI thread.
//!
//! # See also
//! - docs/architecture/offline-storage.md

pub mod cache;
pub mod query;

use crate::model::record::{DomainRecord, RecordId, RecordValidationError};
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use cache::RecordCache;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// User-facing signal set on `SyncStatus::last_error` when a write could not
/// be persisted to any local backend.
pub const SAVE_FAILED_MESSAGE: &str = "could not save, please retry";

pub type EngineResult<T> = Result<T, EngineError>;

/// Caller-input failures surfaced by the engine. Storage and network
/// degradation are absorbed (logged, status-tracked) and never appear here.
#[derive(Debug)]
pub enum EngineError {
    /// Owner id was empty or whitespace.
    EmptyOwner,
    /// The record handed to `add_record` belongs to a different owner.
    OwnerMismatch { expected: String, actual: String },
    /// Update targeted an id that does not exist for this owner.
    NotFound(RecordId),
    /// Record failed shape validation at a write boundary.
    Validation(RecordValidationError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOwner => write!(f, "owner id cannot be empty"),
            Self::OwnerMismatch { expected, actual } => write!(
                f,
                "record owner `{actual}` does not match requested owner `{expected}`"
            ),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for EngineError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Transient per-engine sync state. Never persisted; resets with the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    /// Instant of the last successful remote refresh.
    pub last_sync_time: Option<DateTime<Utc>>,
    pub is_loading: bool,
    /// `Some(SAVE_FAILED_MESSAGE)` after a write reached no local backend;
    /// cleared by the next successful persist.
    pub last_error: Option<String>,
}

/// Outcome of a local-blob repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Blob parsed fine; nothing was touched.
    Intact,
    /// Corrupt blob replaced by the owner's remote collection.
    RebuiltFromRemote(usize),
    /// Corrupt blob replaced by an empty collection (remote unreachable).
    ResetToEmpty,
}

/// Builds the local-store key for one domain/owner pair.
pub fn storage_key(namespace: &str, owner_id: &str) -> String {
    format!("{namespace}/{owner_id}")
}

/// Generic offline-first engine bound to one domain namespace.
pub struct SyncEngine<R: DomainRecord> {
    namespace: &'static str,
    store: Box<dyn LocalStore>,
    remote: Box<dyn RemoteStore<R>>,
    cache: RecordCache<R>,
    status: SyncStatus,
}

impl<R: DomainRecord> SyncEngine<R> {
    pub fn new(
        namespace: &'static str,
        store: Box<dyn LocalStore>,
        remote: Box<dyn RemoteStore<R>>,
    ) -> Self {
        Self {
            namespace,
            store,
            remote,
            cache: RecordCache::new(),
            status: SyncStatus::default(),
        }
    }

    /// Snapshot of the transient sync status.
    pub fn status(&self) -> SyncStatus {
        self.status.clone()
    }

    /// Drops one owner's cache entry, or all entries (sign-out path).
    /// Durable state is untouched; the next load re-reads the store.
    pub fn clear_cache(&mut self, owner_id: Option<&str>) {
        self.cache.clear(owner_id);
        info!(
            "event=cache_clear module=engine status=ok namespace={} scope={}",
            self.namespace,
            owner_id.unwrap_or("all")
        );
    }

    /// Loads one owner's collection: cache, else local store, refreshed from
    /// the remote when reachable (remote wins and is written back).
    pub fn load_records(&mut self, owner_id: &str) -> EngineResult<Vec<R>> {
        ensure_owner(owner_id)?;

        if let Some(records) = self.cache.get(owner_id) {
            return Ok(records.to_vec());
        }

        self.status.is_loading = true;
        let mut records = self.read_local(owner_id);

        if self.remote.is_reachable() {
            match self.remote.list_by_owner(owner_id) {
                Ok(remote_records) => {
                    let fetched = remote_records.len();
                    let (clean, dropped) = sanitize_collection(remote_records, owner_id);
                    if dropped > 0 {
                        warn!(
                            "event=remote_refresh module=engine status=partial namespace={} owner={owner_id} dropped={dropped}",
                            self.namespace
                        );
                    }
                    records = clean;
                    self.persist_local(owner_id, &records);
                    self.status.last_sync_time = Some(Utc::now());
                    info!(
                        "event=remote_refresh module=engine status=ok namespace={} owner={owner_id} count={fetched}",
                        self.namespace
                    );
                }
                Err(err) => {
                    // reads never fail on remote errors; local result stands
                    warn!(
                        "event=remote_refresh module=engine status=error namespace={} owner={owner_id} error={err}",
                        self.namespace
                    );
                }
            }
        }

        self.cache.replace(owner_id, records.clone());
        self.status.is_loading = false;
        Ok(records)
    }

    /// Adds one record: draws a collision-free id, stamps timestamps, then
    /// persists locally before the best-effort remote insert.
    pub fn add_record(&mut self, owner_id: &str, mut record: R) -> EngineResult<R> {
        ensure_owner(owner_id)?;
        if record.owner_id() != owner_id {
            return Err(EngineError::OwnerMismatch {
                expected: owner_id.to_string(),
                actual: record.owner_id().to_string(),
            });
        }

        let mut records = self.load_records(owner_id)?;
        let existing_ids: HashSet<String> = records
            .iter()
            .map(|record| record.id().to_string())
            .collect();
        record.set_id(draw_unique_id(&existing_ids));
        record.stamp_created(Utc::now());
        record.validate()?;

        records.push(record.clone());
        self.persist_local(owner_id, &records);
        self.cache.replace(owner_id, records);

        if self.remote.is_reachable() {
            if let Err(err) = self.remote.insert(&record) {
                warn!(
                    "event=remote_insert module=engine status=error namespace={} owner={owner_id} id={} error={err}",
                    self.namespace,
                    record.id()
                );
            }
        }

        info!(
            "event=record_added module=engine status=ok namespace={} owner={owner_id} id={}",
            self.namespace,
            record.id()
        );
        Ok(record)
    }

    /// Updates one record in place. Surfaces `NotFound` for unknown ids;
    /// remote failure after the local persist is swallowed.
    pub fn update_record<F>(&mut self, owner_id: &str, id: &str, apply: F) -> EngineResult<R>
    where
        F: FnOnce(&mut R),
    {
        ensure_owner(owner_id)?;

        let mut records = self.load_records(owner_id)?;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            return Err(EngineError::NotFound(id.to_string()));
        };

        apply(&mut records[index]);
        records[index].stamp_updated(Utc::now());
        records[index].validate()?;
        let updated = records[index].clone();

        self.persist_local(owner_id, &records);
        let applied = updated.clone();
        self.cache.mutate(owner_id, id, move |record| *record = applied);

        if self.remote.is_reachable() {
            if let Err(err) = self.remote.update(owner_id, id, &updated) {
                warn!(
                    "event=remote_update module=engine status=error namespace={} owner={owner_id} id={id} error={err}",
                    self.namespace
                );
            }
        }

        Ok(updated)
    }

    /// Deletes one record. A missing id is a benign no-op, not an error.
    pub fn delete_record(&mut self, owner_id: &str, id: &str) -> EngineResult<()> {
        ensure_owner(owner_id)?;

        let mut records = self.load_records(owner_id)?;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            warn!(
                "event=record_delete module=engine status=missing namespace={} owner={owner_id} id={id}",
                self.namespace
            );
            return Ok(());
        };

        records.remove(index);
        self.persist_local(owner_id, &records);
        self.cache.remove(owner_id, id);

        if self.remote.is_reachable() {
            if let Err(err) = self.remote.delete(owner_id, id) {
                warn!(
                    "event=remote_delete module=engine status=error namespace={} owner={owner_id} id={id} error={err}",
                    self.namespace
                );
            }
        }

        info!(
            "event=record_deleted module=engine status=ok namespace={} owner={owner_id} id={id}",
            self.namespace
        );
        Ok(())
    }

    /// Detects a corrupt local blob and rebuilds it from the remote when
    /// reachable, else resets it to an empty collection. The blob is never
    /// left unparseable.
    pub fn repair_local_store(&mut self, owner_id: &str) -> EngineResult<RepairOutcome> {
        ensure_owner(owner_id)?;

        let key = storage_key(self.namespace, owner_id);
        let raw = match self.store.get_string(&key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=repair module=engine status=read_error namespace={} owner={owner_id} error={err}",
                    self.namespace
                );
                None
            }
        };
        let corrupt = match raw {
            None => false,
            Some(payload) => serde_json::from_str::<Vec<R>>(&payload).is_err(),
        };
        if !corrupt {
            return Ok(RepairOutcome::Intact);
        }

        warn!(
            "event=repair module=engine status=corrupt_blob namespace={} owner={owner_id}",
            self.namespace
        );

        if self.remote.is_reachable() {
            match self.remote.list_by_owner(owner_id) {
                Ok(remote_records) => {
                    let (clean, _) = sanitize_collection(remote_records, owner_id);
                    let count = clean.len();
                    self.persist_local(owner_id, &clean);
                    self.cache.replace(owner_id, clean);
                    self.status.last_sync_time = Some(Utc::now());
                    info!(
                        "event=repair module=engine status=rebuilt namespace={} owner={owner_id} count={count}",
                        self.namespace
                    );
                    return Ok(RepairOutcome::RebuiltFromRemote(count));
                }
                Err(err) => {
                    warn!(
                        "event=repair module=engine status=remote_error namespace={} owner={owner_id} error={err}",
                        self.namespace
                    );
                }
            }
        }

        self.persist_local(owner_id, &[]);
        self.cache.replace(owner_id, Vec::new());
        info!(
            "event=repair module=engine status=reset namespace={} owner={owner_id}",
            self.namespace
        );
        Ok(RepairOutcome::ResetToEmpty)
    }

    /// Reads and sanitizes the durable blob. Corruption and read failures
    /// degrade to an empty collection; a cleaned collection is written back
    /// when anything was dropped.
    fn read_local(&mut self, owner_id: &str) -> Vec<R> {
        let key = storage_key(self.namespace, owner_id);
        let raw = match self.store.get_string(&key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=local_read module=engine status=error namespace={} owner={owner_id} error={err}",
                    self.namespace
                );
                None
            }
        };
        let Some(raw) = raw else {
            return Vec::new();
        };

        let parsed: Vec<R> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=local_read module=engine status=corrupt namespace={} owner={owner_id} error={err}",
                    self.namespace
                );
                return Vec::new();
            }
        };

        let (clean, dropped) = sanitize_collection(parsed, owner_id);
        if dropped > 0 {
            warn!(
                "event=local_dedup module=engine status=rewritten namespace={} owner={owner_id} dropped={dropped}",
                self.namespace
            );
            self.persist_local(owner_id, &clean);
        }
        clean
    }

    /// Serializes and writes the collection. Failures (after the store's own
    /// fallback chain) are absorbed into `status.last_error`; the caller
    /// keeps its in-memory result.
    fn persist_local(&mut self, owner_id: &str, records: &[R]) {
        let key = storage_key(self.namespace, owner_id);
        let payload = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(err) => {
                error!(
                    "event=local_write module=engine status=encode_error namespace={} owner={owner_id} error={err}",
                    self.namespace
                );
                self.status.last_error = Some(SAVE_FAILED_MESSAGE.to_string());
                return;
            }
        };
        match self.store.set_string(&key, &payload) {
            Ok(()) => {
                self.status.last_error = None;
            }
            Err(err) => {
                error!(
                    "event=local_write module=engine status=error namespace={} owner={owner_id} error={err}",
                    self.namespace
                );
                self.status.last_error = Some(SAVE_FAILED_MESSAGE.to_string());
            }
        }
    }
}

fn ensure_owner(owner_id: &str) -> EngineResult<()> {
    if owner_id.trim().is_empty() {
        return Err(EngineError::EmptyOwner);
    }
    Ok(())
}

/// Drops records that fail validation or belong to another owner, then
/// deduplicates by id keeping the first occurrence. Returns the cleaned
/// collection and how many records were dropped.
fn sanitize_collection<R: DomainRecord>(records: Vec<R>, owner_id: &str) -> (Vec<R>, usize) {
    let total = records.len();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(total);

    for record in records {
        if let Err(err) = record.validate() {
            warn!(
                "event=record_dropped module=engine reason=invalid owner={owner_id} error={err}"
            );
            continue;
        }
        if record.owner_id() != owner_id {
            warn!(
                "event=record_dropped module=engine reason=foreign_owner owner={owner_id} id={}",
                record.id()
            );
            continue;
        }
        if !seen.insert(record.id().to_string()) {
            warn!(
                "event=record_dropped module=engine reason=duplicate_id owner={owner_id} id={}",
                record.id()
            );
            continue;
        }
        kept.push(record);
    }

    let dropped = total - kept.len();
    (kept, dropped)
}

/// Draws a fresh UUID until it misses the in-memory id set. Collisions are
/// practically improbable; the loop guards the duplicate-id invariant at the
/// write boundary anyway.
fn draw_unique_id(existing: &HashSet<String>) -> RecordId {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !existing.contains(&candidate) {
            return candidate;
        }
        warn!("event=id_collision module=engine status=redraw");
    }
}

#[cfg(test)]
mod tests {
    use super::{draw_unique_id, ensure_owner, sanitize_collection, storage_key, EngineError};
    use crate::model::journal::JournalEntry;
    use std::collections::HashSet;

    fn entry(owner: &str, id: &str) -> JournalEntry {
        let mut entry = JournalEntry::new(owner, "title", "", 3);
        entry.id = id.to_string();
        entry
    }

    #[test]
    fn storage_key_namespaces_per_domain_and_owner() {
        assert_eq!(storage_key("journal_entries", "u1"), "journal_entries/u1");
    }

    #[test]
    fn ensure_owner_rejects_blank() {
        assert!(matches!(ensure_owner("  "), Err(EngineError::EmptyOwner)));
        assert!(ensure_owner("u1").is_ok());
    }

    #[test]
    fn sanitize_keeps_first_of_duplicate_ids() {
        let records = vec![entry("u1", "r1"), entry("u1", "r2"), entry("u1", "r1")];
        let (clean, dropped) = sanitize_collection(records, "u1");
        assert_eq!(clean.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(clean[0].id, "r1");
        assert_eq!(clean[1].id, "r2");
    }

    #[test]
    fn sanitize_drops_foreign_and_invalid_records() {
        let mut invalid = entry("u1", "bad");
        invalid.title = String::new();
        let records = vec![entry("u1", "r1"), entry("u2", "r2"), invalid];
        let (clean, dropped) = sanitize_collection(records, "u1");
        assert_eq!(clean.len(), 1);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn draw_unique_id_avoids_existing_set() {
        let existing: HashSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        let id = draw_unique_id(&existing);
        assert!(!existing.contains(&id));
        assert!(!id.is_empty());
    }
}
