//! Vision-board item model.
//!
//! # Responsibility
//! - Define the board item shape (caption + life area + optional image).
//!
//! # Invariants
//! - `caption` is never empty after validation.
//! - `display_order` is a caller-managed sort hint, not an index.

use crate::model::record::{validate_identity, DomainRecord, RecordId, RecordValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One vision-board item pinned to a life area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    pub id: RecordId,
    pub owner_id: String,
    pub caption: String,
    /// Life area the item belongs to (career, health, relationships, ...).
    #[serde(default)]
    pub life_area: String,
    /// Reference to an uploaded image; the upload pipeline itself lives
    /// outside this crate.
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub is_achieved: bool,
    #[serde(default)]
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardItem {
    /// Creates a board item with a generated id and current timestamps.
    pub fn new(
        owner_id: impl Into<String>,
        caption: impl Into<String>,
        life_area: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            caption: caption.into(),
            life_area: life_area.into(),
            image_ref: None,
            is_achieved: false,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl DomainRecord for BoardItem {
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
        if self.caption.trim().is_empty() {
            return Err(RecordValidationError::EmptyField("caption"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BoardItem;
    use crate::model::record::{DomainRecord, RecordValidationError};

    #[test]
    fn new_item_is_valid() {
        let item = BoardItem::new("u1", "Run a marathon", "health");
        assert!(item.validate().is_ok());
        assert!(!item.is_achieved);
        assert!(item.image_ref.is_none());
    }

    #[test]
    fn empty_caption_fails_validation() {
        let item = BoardItem::new("u1", " ", "health");
        assert_eq!(
            item.validate(),
            Err(RecordValidationError::EmptyField("caption"))
        );
    }
}
