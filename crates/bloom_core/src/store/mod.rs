//! Durable local storage abstractions.
//!
//! # Responsibility
//! - Define the key/string-value contract the sync engine persists through.
//! - Provide the SQLite-backed production store, the in-memory store used as
//!   fallback backend and test double, and the primary/fallback combinator.
//!
//! # Invariants
//! - Store keys are namespaced per domain by the engine; implementations
//!   treat keys as opaque.
//! - Every trait call may block on I/O.
//!
//! # See also
//! - docs/architecture/offline-storage.md

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod fallback;
pub mod memory;
pub mod sqlite;

pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable local storage failure.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Backend refused the operation (used by test doubles and exhausted
    /// fallback chains).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(message) => write!(f, "local store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Key/string-value persistence surviving process restarts.
///
/// The engine serializes one JSON array per `domain/owner` key; the store
/// never inspects values. Errors must be caught and logged by callers, not
/// propagated to the UI.
pub trait LocalStore {
    fn get_string(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_string(&self, key: &str, value: &str) -> StoreResult<()>;
    fn delete(&self, key: &str) -> StoreResult<()>;
}
