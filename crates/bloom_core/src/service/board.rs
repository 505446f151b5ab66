//! Vision-board use-case facade.
//!
//! # Responsibility
//! - Board item create/update/delete over the sync engine.
//! - Board-specific queries: by life area, recently touched, achieved.
//!
//! # Invariants
//! - Captions are trimmed and never empty.
//! - Life areas are matched case-insensitively.

use crate::engine::query;
use crate::engine::{EngineError, RepairOutcome, SyncEngine, SyncStatus};
use crate::model::board::BoardItem;
use crate::model::record::RecordId;
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for vision-board use-cases.
#[derive(Debug)]
pub enum BoardServiceError {
    InvalidItem(String),
    ItemNotFound(RecordId),
    Engine(EngineError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItem(message) => write!(f, "invalid board item: {message}"),
            Self::ItemNotFound(id) => write!(f, "board item not found: {id}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for BoardServiceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::NotFound(id) => Self::ItemNotFound(id),
            EngineError::Validation(err) => Self::InvalidItem(err.to_string()),
            other => Self::Engine(other),
        }
    }
}

/// Input for creating one board item.
#[derive(Debug, Clone, Default)]
pub struct BoardItemDraft {
    pub caption: String,
    pub life_area: String,
    pub image_ref: Option<String>,
    pub display_order: i64,
}

/// Partial update for one board item; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BoardItemPatch {
    pub caption: Option<String>,
    pub life_area: Option<String>,
    pub image_ref: Option<Option<String>>,
    pub display_order: Option<i64>,
}

/// Vision-board facade over one sync engine instance.
pub struct BoardService {
    engine: SyncEngine<BoardItem>,
}

impl BoardService {
    pub const STORAGE_NAMESPACE: &'static str = "board_items";

    pub fn new(store: Box<dyn LocalStore>, remote: Box<dyn RemoteStore<BoardItem>>) -> Self {
        Self {
            engine: SyncEngine::new(Self::STORAGE_NAMESPACE, store, remote),
        }
    }

    /// Creates one board item from a draft.
    pub fn add_item(
        &mut self,
        owner_id: &str,
        draft: BoardItemDraft,
    ) -> Result<BoardItem, BoardServiceError> {
        let caption = draft.caption.trim();
        if caption.is_empty() {
            return Err(BoardServiceError::InvalidItem(
                "caption cannot be empty".to_string(),
            ));
        }
        let mut item = BoardItem::new(owner_id, caption, draft.life_area.trim());
        item.image_ref = draft.image_ref;
        item.display_order = draft.display_order;
        Ok(self.engine.add_record(owner_id, item)?)
    }

    /// All board items for one owner (cache-or-load path).
    pub fn items(&mut self, owner_id: &str) -> Result<Vec<BoardItem>, BoardServiceError> {
        Ok(self.engine.load_records(owner_id)?)
    }

    /// Items belonging to one life area (case-insensitive match), sorted by
    /// display order.
    pub fn items_in_life_area(
        &mut self,
        owner_id: &str,
        life_area: &str,
    ) -> Result<Vec<BoardItem>, BoardServiceError> {
        let wanted = life_area.trim().to_lowercase();
        let mut items = self.items(owner_id)?;
        items.retain(|item| item.life_area.trim().to_lowercase() == wanted);
        items.sort_by_key(|item| item.display_order);
        Ok(items)
    }

    /// N most-recently-touched items, newest first.
    pub fn recently_touched(
        &mut self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<BoardItem>, BoardServiceError> {
        let items = self.items(owner_id)?;
        Ok(query::most_recently_touched(&items, limit))
    }

    /// Items marked achieved.
    pub fn achieved_items(&mut self, owner_id: &str) -> Result<Vec<BoardItem>, BoardServiceError> {
        let mut items = self.items(owner_id)?;
        items.retain(|item| item.is_achieved);
        Ok(items)
    }

    /// Applies a partial update; fails with `ItemNotFound` for unknown ids.
    pub fn update_item(
        &mut self,
        owner_id: &str,
        id: &str,
        patch: BoardItemPatch,
    ) -> Result<BoardItem, BoardServiceError> {
        if let Some(caption) = &patch.caption {
            if caption.trim().is_empty() {
                return Err(BoardServiceError::InvalidItem(
                    "caption cannot be empty".to_string(),
                ));
            }
        }
        Ok(self.engine.update_record(owner_id, id, move |item| {
            if let Some(caption) = patch.caption {
                item.caption = caption.trim().to_string();
            }
            if let Some(life_area) = patch.life_area {
                item.life_area = life_area.trim().to_string();
            }
            if let Some(image_ref) = patch.image_ref {
                item.image_ref = image_ref;
            }
            if let Some(display_order) = patch.display_order {
                item.display_order = display_order;
            }
        })?)
    }

    /// Flips the achieved flag (read-modify-write over one update).
    pub fn toggle_achieved(
        &mut self,
        owner_id: &str,
        id: &str,
    ) -> Result<BoardItem, BoardServiceError> {
        Ok(self.engine.update_record(owner_id, id, |item| {
            item.is_achieved = !item.is_achieved;
        })?)
    }

    /// Deletes one item; missing ids are a benign no-op.
    pub fn delete_item(&mut self, owner_id: &str, id: &str) -> Result<(), BoardServiceError> {
        Ok(self.engine.delete_record(owner_id, id)?)
    }

    /// Repairs a corrupt local blob (rebuild from remote, else reset empty).
    pub fn repair_local_store(
        &mut self,
        owner_id: &str,
    ) -> Result<RepairOutcome, BoardServiceError> {
        Ok(self.engine.repair_local_store(owner_id)?)
    }

    /// Drops cached state for one owner, or all owners on full sign-out.
    pub fn sign_out(&mut self, owner_id: Option<&str>) {
        self.engine.clear_cache(owner_id);
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.engine.status()
    }
}
