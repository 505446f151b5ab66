//! In-process remote store.
//!
//! Backs integration tests and the CLI smoke probe. Clones share state, and
//! reachability plus per-operation failures are injectable, so offline and
//! degraded-network paths can be exercised deterministically.

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::model::record::DomainRecord;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Inner<R> {
    collections: BTreeMap<String, Vec<R>>,
    reachable: bool,
    fail_writes: bool,
    fail_lists: bool,
}

/// Shared-handle remote store with injectable faults.
#[derive(Clone)]
pub struct MemoryRemote<R: DomainRecord> {
    inner: Arc<Mutex<Inner<R>>>,
}

impl<R: DomainRecord> MemoryRemote<R> {
    /// Creates a reachable remote with no records.
    pub fn new() -> Self {
        Self::with_reachability(true)
    }

    /// Creates a remote whose probe always reports unreachable.
    pub fn offline() -> Self {
        Self::with_reachability(false)
    }

    fn with_reachability(reachable: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                collections: BTreeMap::new(),
                reachable,
                fail_writes: false,
                fail_lists: false,
            })),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.lock_inner().reachable = reachable;
    }

    /// Makes insert/update/delete fail while the probe still reports online.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock_inner().fail_writes = fail;
    }

    /// Makes list_by_owner fail while the probe still reports online.
    pub fn set_fail_lists(&self, fail: bool) {
        self.lock_inner().fail_lists = fail;
    }

    /// Replaces one owner's remote collection wholesale.
    pub fn seed(&self, owner_id: &str, records: Vec<R>) {
        self.lock_inner()
            .collections
            .insert(owner_id.to_string(), records);
    }

    /// Snapshot of one owner's remote collection.
    pub fn records_for(&self, owner_id: &str) -> Vec<R> {
        self.lock_inner()
            .collections
            .get(owner_id)
            .cloned()
            .unwrap_or_default()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: DomainRecord> Default for MemoryRemote<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DomainRecord> RemoteStore<R> for MemoryRemote<R> {
    fn is_reachable(&self) -> bool {
        self.lock_inner().reachable
    }

    fn list_by_owner(&self, owner_id: &str) -> RemoteResult<Vec<R>> {
        let inner = self.lock_inner();
        if !inner.reachable {
            return Err(RemoteError::Unavailable);
        }
        if inner.fail_lists {
            return Err(RemoteError::OperationFailed("injected list failure".into()));
        }
        Ok(inner
            .collections
            .get(owner_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert(&self, record: &R) -> RemoteResult<()> {
        let mut inner = self.lock_inner();
        if !inner.reachable {
            return Err(RemoteError::Unavailable);
        }
        if inner.fail_writes {
            return Err(RemoteError::OperationFailed(
                "injected insert failure".into(),
            ));
        }
        let collection = inner
            .collections
            .entry(record.owner_id().to_string())
            .or_default();
        // upsert: re-sending an id the backend already has replaces it
        collection.retain(|existing| existing.id() != record.id());
        collection.push(record.clone());
        Ok(())
    }

    fn update(&self, owner_id: &str, id: &str, record: &R) -> RemoteResult<()> {
        let mut inner = self.lock_inner();
        if !inner.reachable {
            return Err(RemoteError::Unavailable);
        }
        if inner.fail_writes {
            return Err(RemoteError::OperationFailed(
                "injected update failure".into(),
            ));
        }
        let Some(collection) = inner.collections.get_mut(owner_id) else {
            return Err(RemoteError::OperationFailed(format!(
                "no collection for owner {owner_id}"
            )));
        };
        let Some(slot) = collection.iter_mut().find(|existing| existing.id() == id) else {
            return Err(RemoteError::OperationFailed(format!(
                "record not found: {id}"
            )));
        };
        *slot = record.clone();
        Ok(())
    }

    fn delete(&self, owner_id: &str, id: &str) -> RemoteResult<()> {
        let mut inner = self.lock_inner();
        if !inner.reachable {
            return Err(RemoteError::Unavailable);
        }
        if inner.fail_writes {
            return Err(RemoteError::OperationFailed(
                "injected delete failure".into(),
            ));
        }
        if let Some(collection) = inner.collections.get_mut(owner_id) {
            collection.retain(|existing| existing.id() != id);
        }
        Ok(())
    }
}
