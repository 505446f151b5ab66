//! Journal use-case facade.
//!
//! # Responsibility
//! - Entry create/update/delete over the sync engine.
//! - Journal-specific queries: by date, text search, favorites, recency.
//!
//! # Invariants
//! - Entry titles are trimmed and never empty.
//! - Tags are normalized lowercase and deduplicated before persistence.

use crate::engine::query;
use crate::engine::{EngineError, RepairOutcome, SyncEngine, SyncStatus};
use crate::model::journal::JournalEntry;
use crate::model::record::RecordId;
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// Draft or patch carries an unusable field value.
    InvalidEntry(String),
    /// Target entry does not exist for this owner.
    EntryNotFound(RecordId),
    /// Engine-level failure (owner scoping, validation).
    Engine(EngineError),
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntry(message) => write!(f, "invalid journal entry: {message}"),
            Self::EntryNotFound(id) => write!(f, "journal entry not found: {id}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for JournalServiceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::NotFound(id) => Self::EntryNotFound(id),
            EngineError::Validation(err) => Self::InvalidEntry(err.to_string()),
            other => Self::Engine(other),
        }
    }
}

/// Input for creating one journal entry.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryDraft {
    pub title: String,
    pub body: String,
    pub mood: i32,
    pub tags: Vec<String>,
}

/// Partial update for one journal entry; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub mood: Option<i32>,
    pub tags: Option<Vec<String>>,
}

/// Journal facade over one sync engine instance.
pub struct JournalService {
    engine: SyncEngine<JournalEntry>,
}

impl JournalService {
    pub const STORAGE_NAMESPACE: &'static str = "journal_entries";

    pub fn new(
        store: Box<dyn LocalStore>,
        remote: Box<dyn RemoteStore<JournalEntry>>,
    ) -> Self {
        Self {
            engine: SyncEngine::new(Self::STORAGE_NAMESPACE, store, remote),
        }
    }

    /// Creates one entry from a draft.
    pub fn add_entry(
        &mut self,
        owner_id: &str,
        draft: JournalEntryDraft,
    ) -> Result<JournalEntry, JournalServiceError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(JournalServiceError::InvalidEntry(
                "title cannot be empty".to_string(),
            ));
        }
        let mut entry = JournalEntry::new(owner_id, title, draft.body, draft.mood);
        entry.tags = normalize_tags(&draft.tags);
        Ok(self.engine.add_record(owner_id, entry)?)
    }

    /// All entries for one owner (cache-or-load path).
    pub fn entries(&mut self, owner_id: &str) -> Result<Vec<JournalEntry>, JournalServiceError> {
        Ok(self.engine.load_records(owner_id)?)
    }

    /// Entries created on one calendar day (UTC).
    pub fn entries_on_date(
        &mut self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<JournalEntry>, JournalServiceError> {
        let mut entries = self.entries(owner_id)?;
        entries.retain(|entry| entry.created_at.date_naive() == date);
        Ok(entries)
    }

    /// Case-insensitive substring search across title, body and tags.
    pub fn search_entries(
        &mut self,
        owner_id: &str,
        query: &str,
    ) -> Result<Vec<JournalEntry>, JournalServiceError> {
        let entries = self.entries(owner_id)?;
        Ok(query::search_text(&entries, query, |entry| {
            format!("{}\n{}\n{}", entry.title, entry.body, entry.tags.join(" "))
        }))
    }

    /// N most-recently-touched entries, newest first.
    pub fn recent_entries(
        &mut self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, JournalServiceError> {
        let entries = self.entries(owner_id)?;
        Ok(query::most_recently_touched(&entries, limit))
    }

    /// Entries marked as favorite.
    pub fn favorites(&mut self, owner_id: &str) -> Result<Vec<JournalEntry>, JournalServiceError> {
        let mut entries = self.entries(owner_id)?;
        entries.retain(|entry| entry.is_favorite);
        Ok(entries)
    }

    /// Distinct normalized tags across one owner's entries, sorted.
    pub fn tags(&mut self, owner_id: &str) -> Result<Vec<String>, JournalServiceError> {
        let entries = self.entries(owner_id)?;
        let mut tags: Vec<String> = entries
            .iter()
            .flat_map(|entry| entry.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    /// Applies a partial update; fails with `EntryNotFound` for unknown ids.
    pub fn update_entry(
        &mut self,
        owner_id: &str,
        id: &str,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntry, JournalServiceError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(JournalServiceError::InvalidEntry(
                    "title cannot be empty".to_string(),
                ));
            }
        }
        Ok(self.engine.update_record(owner_id, id, move |entry| {
            if let Some(title) = patch.title {
                entry.title = title.trim().to_string();
            }
            if let Some(body) = patch.body {
                entry.body = body;
            }
            if let Some(mood) = patch.mood {
                entry.mood = mood;
            }
            if let Some(tags) = patch.tags {
                entry.tags = normalize_tags(&tags);
            }
        })?)
    }

    /// Flips the favorite flag (read-modify-write over one update).
    pub fn toggle_favorite(
        &mut self,
        owner_id: &str,
        id: &str,
    ) -> Result<JournalEntry, JournalServiceError> {
        Ok(self.engine.update_record(owner_id, id, |entry| {
            entry.is_favorite = !entry.is_favorite;
        })?)
    }

    /// Deletes one entry; missing ids are a benign no-op.
    pub fn delete_entry(&mut self, owner_id: &str, id: &str) -> Result<(), JournalServiceError> {
        Ok(self.engine.delete_record(owner_id, id)?)
    }

    /// Repairs a corrupt local blob (rebuild from remote, else reset empty).
    pub fn repair_local_store(
        &mut self,
        owner_id: &str,
    ) -> Result<RepairOutcome, JournalServiceError> {
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

/// Lowercases, trims, deduplicates and drops empty tags, preserving first
/// occurrence order.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalized.contains(&tag) {
            continue;
        }
        normalized.push(tag);
    }
    normalized
}
