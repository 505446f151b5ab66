//! Record contract consumed by the generic sync engine.
//!
//! # Responsibility
//! - Define the `DomainRecord` trait binding the engine to a record shape.
//! - Define validation applied at the deserialization boundary.
//!
//! # Invariants
//! - `id` is stable after the engine assigns it and never reused within an
//!   owner's collection.
//! - `stamp_created` sets both timestamps; `stamp_updated` only advances
//!   `updated_at`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one synced record.
///
/// Generated as a UUID v4 in text form, but kept as a plain string because
/// remote backends may hand back ids in other formats.
pub type RecordId = String;

/// Validation failure for a record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `id` is empty or whitespace.
    MissingId,
    /// `owner_id` is empty or whitespace.
    MissingOwner,
    /// A required domain field is empty.
    EmptyField(&'static str),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "record id cannot be empty"),
            Self::MissingOwner => write!(f, "record owner cannot be empty"),
            Self::EmptyField(field) => write!(f, "record field cannot be empty: {field}"),
        }
    }
}

impl Error for RecordValidationError {}

/// Contract between one record shape and the generic sync engine.
///
/// The engine is the only caller of the setter half; facades and UI layers
/// treat records as read-only snapshots and mutate through the engine.
pub trait DomainRecord: Clone + Serialize + DeserializeOwned {
    /// Stable record id.
    fn id(&self) -> &str;

    /// Owner scope the record belongs to.
    fn owner_id(&self) -> &str;

    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;

    /// Last-touched timestamp.
    fn updated_at(&self) -> DateTime<Utc>;

    /// Replaces the record id. Engine-only, used at the add boundary where
    /// ids are drawn collision-free.
    fn set_id(&mut self, id: RecordId);

    /// Sets `created_at` and `updated_at` to the same instant.
    fn stamp_created(&mut self, at: DateTime<Utc>);

    /// Advances `updated_at` only.
    fn stamp_updated(&mut self, at: DateTime<Utc>);

    /// Checks structural invariants. Applied before every persist and to
    /// every record read back from the local blob.
    fn validate(&self) -> Result<(), RecordValidationError>;
}

/// Shared id/owner checks used by every record shape.
pub(crate) fn validate_identity(id: &str, owner_id: &str) -> Result<(), RecordValidationError> {
    if id.trim().is_empty() {
        return Err(RecordValidationError::MissingId);
    }
    if owner_id.trim().is_empty() {
        return Err(RecordValidationError::MissingOwner);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_identity, RecordValidationError};

    #[test]
    fn identity_requires_non_empty_id() {
        assert_eq!(
            validate_identity("  ", "u1"),
            Err(RecordValidationError::MissingId)
        );
    }

    #[test]
    fn identity_requires_non_empty_owner() {
        assert_eq!(
            validate_identity("r1", ""),
            Err(RecordValidationError::MissingOwner)
        );
    }

    #[test]
    fn identity_accepts_valid_pair() {
        assert!(validate_identity("r1", "u1").is_ok());
    }
}
