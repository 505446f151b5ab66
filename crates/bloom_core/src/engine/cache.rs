//! Per-owner in-memory record cache.
//!
//! # Responsibility
//! - Fast, synchronous read access to the last-known-good collection per
//!   owner within one process lifetime.
//!
//! # Invariants
//! - Memory only: never touches the local store or remote store.
//! - An owner entry exists only after a load completed for that owner.
//! - Only the sync engine owning this cache may mutate it.

use crate::model::record::DomainRecord;
use std::collections::HashMap;

/// Mapping `owner_id -> ordered record collection`.
#[derive(Debug)]
pub struct RecordCache<R> {
    entries: HashMap<String, Vec<R>>,
}

impl<R: DomainRecord> RecordCache<R> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached collection, or `None` if no load has completed for
    /// this owner yet. An empty slice is a real (empty) collection.
    pub fn get(&self, owner_id: &str) -> Option<&[R]> {
        self.entries.get(owner_id).map(Vec::as_slice)
    }

    /// Swaps the entire collection for one owner.
    pub fn replace(&mut self, owner_id: &str, records: Vec<R>) {
        self.entries.insert(owner_id.to_string(), records);
    }

    /// Applies a transformation to exactly one record. Returns `false` when
    /// the owner or record is unknown.
    pub fn mutate<F>(&mut self, owner_id: &str, id: &str, apply: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        let Some(records) = self.entries.get_mut(owner_id) else {
            return false;
        };
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            return false;
        };
        apply(record);
        true
    }

    /// Removes one record. Returns `false` when nothing was removed.
    pub fn remove(&mut self, owner_id: &str, id: &str) -> bool {
        let Some(records) = self.entries.get_mut(owner_id) else {
            return false;
        };
        let before = records.len();
        records.retain(|record| record.id() != id);
        records.len() != before
    }

    /// Drops one owner's entry, or every entry when `owner_id` is `None`
    /// (sign-out path).
    pub fn clear(&mut self, owner_id: Option<&str>) {
        match owner_id {
            Some(owner_id) => {
                self.entries.remove(owner_id);
            }
            None => self.entries.clear(),
        }
    }
}

impl<R: DomainRecord> Default for RecordCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordCache;
    use crate::model::journal::JournalEntry;

    fn entry(owner: &str, id: &str, title: &str) -> JournalEntry {
        let mut entry = JournalEntry::new(owner, title, "", 3);
        entry.id = id.to_string();
        entry
    }

    #[test]
    fn get_distinguishes_missing_from_empty() {
        let mut cache = RecordCache::<JournalEntry>::new();
        assert!(cache.get("u1").is_none());

        cache.replace("u1", Vec::new());
        assert_eq!(cache.get("u1").unwrap().len(), 0);
    }

    #[test]
    fn replace_swaps_whole_collection() {
        let mut cache = RecordCache::new();
        cache.replace("u1", vec![entry("u1", "a", "one")]);
        cache.replace("u1", vec![entry("u1", "b", "two"), entry("u1", "c", "three")]);

        let records = cache.get("u1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b");
    }

    #[test]
    fn mutate_targets_exactly_one_record() {
        let mut cache = RecordCache::new();
        cache.replace("u1", vec![entry("u1", "a", "one"), entry("u1", "b", "two")]);

        assert!(cache.mutate("u1", "b", |record| record.title = "renamed".into()));
        let records = cache.get("u1").unwrap();
        assert_eq!(records[0].title, "one");
        assert_eq!(records[1].title, "renamed");
    }

    #[test]
    fn mutate_unknown_record_is_noop() {
        let mut cache = RecordCache::new();
        cache.replace("u1", vec![entry("u1", "a", "one")]);
        assert!(!cache.mutate("u1", "zzz", |record| record.title = "x".into()));
        assert!(!cache.mutate("u2", "a", |record| record.title = "x".into()));
    }

    #[test]
    fn remove_and_clear_behave_per_owner() {
        let mut cache = RecordCache::new();
        cache.replace("u1", vec![entry("u1", "a", "one")]);
        cache.replace("u2", vec![entry("u2", "b", "two")]);

        assert!(cache.remove("u1", "a"));
        assert!(!cache.remove("u1", "a"));

        cache.clear(Some("u2"));
        assert!(cache.get("u2").is_none());
        // u1 still has its (now empty) entry
        assert!(cache.get("u1").is_some());

        cache.clear(None);
        assert!(cache.get("u1").is_none());
    }
}
