//! Core domain logic for Bloom.
//! This crate is the single source of truth for offline-first sync behavior:
//! local cache, durable storage, and best-effort remote reconciliation.

pub mod engine;
pub mod logging;
pub mod model;
pub mod remote;
pub mod service;
pub mod store;

pub use engine::cache::RecordCache;
pub use engine::{
    storage_key, EngineError, RepairOutcome, SyncEngine, SyncStatus, SAVE_FAILED_MESSAGE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::BoardItem;
pub use model::journal::JournalEntry;
pub use model::record::{DomainRecord, RecordId, RecordValidationError};
pub use model::resource::Resource;
pub use remote::{MemoryRemote, RemoteError, RemoteStore};
pub use service::board::{BoardItemDraft, BoardItemPatch, BoardService, BoardServiceError};
pub use service::journal::{
    JournalEntryDraft, JournalEntryPatch, JournalService, JournalServiceError,
};
pub use service::resource::{ResourceDraft, ResourcePatch, ResourceService, ResourceServiceError};
pub use store::{FallbackStore, LocalStore, MemoryStore, SqliteStore, StoreError};

/// Minimal health-check API for early shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
