//! In-memory key/value store.
//!
//! Serves two roles: the fallback backend behind [`FallbackStore`] and the
//! shared-handle test double (clones share state, so tests can inspect blobs
//! written through a boxed handle).
//!
//! [`FallbackStore`]: crate::store::FallbackStore

use super::{LocalStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Inner {
    values: BTreeMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Process-lifetime key/value store with injectable failures.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent reads fail with `StoreError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock_inner().fail_reads = fail;
    }

    /// Makes subsequent writes fail with `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock_inner().fail_writes = fail;
    }

    /// Reads a value bypassing the failure switches. Diagnostic/test hook.
    pub fn raw_value(&self, key: &str) -> Option<String> {
        self.lock_inner().values.get(key).cloned()
    }

    /// Writes a value bypassing the failure switches. Diagnostic/test hook.
    pub fn set_raw_value(&self, key: &str, value: &str) {
        self.lock_inner()
            .values
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.lock_inner().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().values.is_empty()
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalStore for MemoryStore {
    fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        let inner = self.lock_inner();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock_inner();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.lock_inner();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        inner.values.remove(key);
        Ok(())
    }
}
