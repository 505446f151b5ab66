//! Personal resource model.
//!
//! # Responsibility
//! - Define the resource record shape (practices, books, exercises the user
//!   collects and rates).
//!
//! # Invariants
//! - `name` is never empty after validation.
//! - `category` is stored normalized (lowercase, trimmed) by the facade.

use crate::model::record::{validate_identity, DomainRecord, RecordId, RecordValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One personal-development resource with a user rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: RecordId,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// User rating, 1 to 5.
    pub rating: i32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Creates a resource with a generated id and current timestamps.
    pub fn new(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        rating: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            category: category.into(),
            rating,
            notes: String::new(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl DomainRecord for Resource {
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
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyField("name"));
        }
        Ok(())
    }
}
