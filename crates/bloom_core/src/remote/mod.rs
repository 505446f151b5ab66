//! Remote record store seam.
//!
//! # Responsibility
//! - Define the contract to the hosted backend: list/insert/update/delete
//!   scoped by owner, plus a reachability probe.
//!
//! # Invariants
//! - Implementations own their network timeouts; `is_reachable` must be a
//!   bounded best-effort probe, never a hanging call.
//! - Every trait call may block on network I/O.
//!
//! # See also
//! - docs/architecture/offline-storage.md

use crate::model::record::DomainRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

pub use memory::MemoryRemote;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote store failure. Always non-fatal for the engine: reads fall back to
/// local data and writes stay locally durable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Backend is not reachable right now.
    Unavailable,
    /// Backend was reached but rejected or failed the operation.
    OperationFailed(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "remote store is unreachable"),
            Self::OperationFailed(message) => write!(f, "remote operation failed: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Owner-scoped record store reachable over the network.
///
/// `update` takes the full updated record rather than a partial field set;
/// the typed record is the wire contract of this seam.
pub trait RemoteStore<R: DomainRecord> {
    /// Best-effort connectivity probe deciding whether the remote branch of
    /// read/write paths is attempted at all.
    fn is_reachable(&self) -> bool;

    /// Full fetch of one owner's collection. Authoritative when it succeeds.
    fn list_by_owner(&self, owner_id: &str) -> RemoteResult<Vec<R>>;

    fn insert(&self, record: &R) -> RemoteResult<()>;

    fn update(&self, owner_id: &str, id: &str, record: &R) -> RemoteResult<()>;

    fn delete(&self, owner_id: &str, id: &str) -> RemoteResult<()>;
}
