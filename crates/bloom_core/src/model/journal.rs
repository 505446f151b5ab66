//! Journal entry model.
//!
//! # Responsibility
//! - Define the journal record shape synced between device and backend.
//!
//! # Invariants
//! - `title` is never empty after validation.
//! - Field names serialize camelCase to match the hosted backend schema.

use crate::model::record::{validate_identity, DomainRecord, RecordId, RecordValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One dated journal entry with a self-reported mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: RecordId,
    pub owner_id: String,
    pub title: String,
    /// Free-form body text (may be empty for quick mood check-ins).
    #[serde(default)]
    pub body: String,
    /// Self-reported mood, 1 (low) to 5 (high).
    pub mood: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates an entry with a generated id and current timestamps.
    ///
    /// The engine re-draws the id and timestamps at the add boundary; this
    /// constructor only guarantees a structurally valid starting point.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        mood: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            body: body.into(),
            mood,
            tags: Vec::new(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl DomainRecord for JournalEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }

    fn stamp_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        validate_identity(&self.id, &self.owner_id)?;
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::EmptyField("title"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JournalEntry;
    use crate::model::record::{DomainRecord, RecordValidationError};

    #[test]
    fn new_entry_is_valid() {
        let entry = JournalEntry::new("u1", "Morning pages", "slept well", 4);
        assert!(entry.validate().is_ok());
        assert_eq!(entry.created_at, entry.updated_at);
        assert!(!entry.is_favorite);
    }

    #[test]
    fn empty_title_fails_validation() {
        let entry = JournalEntry::new("u1", "  ", "", 3);
        assert_eq!(
            entry.validate(),
            Err(RecordValidationError::EmptyField("title"))
        );
    }

    #[test]
    fn serializes_camel_case_fields() {
        let entry = JournalEntry::new("u1", "Title", "Body", 5);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"ownerId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"isFavorite\""));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "r1",
            "ownerId": "u1",
            "title": "Imported",
            "mood": 2,
            "createdAt": "2026-01-10T08:00:00Z",
            "updatedAt": "2026-01-10T08:00:00Z"
        }"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert!(entry.body.is_empty());
        assert!(entry.tags.is_empty());
        assert!(!entry.is_favorite);
    }
}
