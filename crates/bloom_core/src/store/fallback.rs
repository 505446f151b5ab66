//! Primary/secondary store combinator.
//!
//! # Responsibility
//! - Retry each failed primary operation once against a secondary backend,
//!   so the engine's persist path stays linear.
//!
//! # Invariants
//! - The secondary backend is only touched after a primary failure.
//! - An error escapes only when both backends fail.

use super::{LocalStore, StoreResult};
use log::warn;

/// Local store that falls back to a secondary backend on primary failure.
pub struct FallbackStore {
    primary: Box<dyn LocalStore>,
    secondary: Box<dyn LocalStore>,
}

impl FallbackStore {
    pub fn new(primary: Box<dyn LocalStore>, secondary: Box<dyn LocalStore>) -> Self {
        Self { primary, secondary }
    }
}

impl LocalStore for FallbackStore {
    fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        match self.primary.get_string(key) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!("event=store_fallback module=store op=get status=retry key={key} error={err}");
                self.secondary.get_string(key)
            }
        }
    }

    fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        match self.primary.set_string(key, value) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("event=store_fallback module=store op=set status=retry key={key} error={err}");
                self.secondary.set_string(key, value)
            }
        }
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        match self.primary.delete(key) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("event=store_fallback module=store op=delete status=retry key={key} error={err}");
                self.secondary.delete(key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FallbackStore;
    use crate::store::{LocalStore, MemoryStore};

    #[test]
    fn healthy_primary_never_touches_secondary() {
        let primary = MemoryStore::new();
        let secondary = MemoryStore::new();
        let store = FallbackStore::new(Box::new(primary.clone()), Box::new(secondary.clone()));

        store.set_string("k", "v").unwrap();
        assert_eq!(primary.raw_value("k").as_deref(), Some("v"));
        assert!(secondary.is_empty());
    }

    #[test]
    fn failed_primary_write_lands_in_secondary() {
        let primary = MemoryStore::new();
        let secondary = MemoryStore::new();
        primary.set_fail_writes(true);
        let store = FallbackStore::new(Box::new(primary.clone()), Box::new(secondary.clone()));

        store.set_string("k", "v").unwrap();
        assert_eq!(primary.raw_value("k"), None);
        assert_eq!(secondary.raw_value("k").as_deref(), Some("v"));
    }

    #[test]
    fn failed_primary_read_falls_back() {
        let primary = MemoryStore::new();
        let secondary = MemoryStore::new();
        secondary.set_raw_value("k", "v");
        primary.set_fail_reads(true);
        let store = FallbackStore::new(Box::new(primary), Box::new(secondary));

        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn both_backends_failing_surfaces_error() {
        let primary = MemoryStore::new();
        let secondary = MemoryStore::new();
        primary.set_fail_writes(true);
        secondary.set_fail_writes(true);
        let store = FallbackStore::new(Box::new(primary), Box::new(secondary));

        assert!(store.set_string("k", "v").is_err());
    }
}
