//! Personal-resource use-case facade.
//!
//! # Responsibility
//! - Resource create/update/delete over the sync engine.
//! - Resource-specific queries: by category, top-rated, text search.
//!
//! # Invariants
//! - Resource names are trimmed and never empty.
//! - Categories are matched and stored normalized (lowercase, trimmed).

use crate::engine::query;
use crate::engine::{EngineError, RepairOutcome, SyncEngine, SyncStatus};
use crate::model::record::RecordId;
use crate::model::resource::Resource;
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for resource use-cases.
#[derive(Debug)]
pub enum ResourceServiceError {
    InvalidResource(String),
    ResourceNotFound(RecordId),
    Engine(EngineError),
}

impl Display for ResourceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidResource(message) => write!(f, "invalid resource: {message}"),
            Self::ResourceNotFound(id) => write!(f, "resource not found: {id}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ResourceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for ResourceServiceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::NotFound(id) => Self::ResourceNotFound(id),
            EngineError::Validation(err) => Self::InvalidResource(err.to_string()),
            other => Self::Engine(other),
        }
    }
}

/// Input for creating one resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceDraft {
    pub name: String,
    pub category: String,
    pub rating: i32,
    pub notes: String,
}

/// Partial update for one resource; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

/// Resource facade over one sync engine instance.
pub struct ResourceService {
    engine: SyncEngine<Resource>,
}

impl ResourceService {
    pub const STORAGE_NAMESPACE: &'static str = "resources";

    pub fn new(store: Box<dyn LocalStore>, remote: Box<dyn RemoteStore<Resource>>) -> Self {
        Self {
            engine: SyncEngine::new(Self::STORAGE_NAMESPACE, store, remote),
        }
    }

    /// Creates one resource from a draft.
    pub fn add_resource(
        &mut self,
        owner_id: &str,
        draft: ResourceDraft,
    ) -> Result<Resource, ResourceServiceError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ResourceServiceError::InvalidResource(
                "name cannot be empty".to_string(),
            ));
        }
        let mut resource =
            Resource::new(owner_id, name, normalize_category(&draft.category), draft.rating);
        resource.notes = draft.notes;
        Ok(self.engine.add_record(owner_id, resource)?)
    }

    /// All resources for one owner (cache-or-load path).
    pub fn resources(&mut self, owner_id: &str) -> Result<Vec<Resource>, ResourceServiceError> {
        Ok(self.engine.load_records(owner_id)?)
    }

    /// Resources in one category (case-insensitive match).
    pub fn resources_in_category(
        &mut self,
        owner_id: &str,
        category: &str,
    ) -> Result<Vec<Resource>, ResourceServiceError> {
        let wanted = normalize_category(category);
        let mut resources = self.resources(owner_id)?;
        resources.retain(|resource| normalize_category(&resource.category) == wanted);
        Ok(resources)
    }

    /// N highest-rated resources, ties in insertion order.
    pub fn top_rated(
        &mut self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<Resource>, ResourceServiceError> {
        let resources = self.resources(owner_id)?;
        Ok(query::top_by_rank(&resources, limit, |resource| {
            i64::from(resource.rating)
        }))
    }

    /// Case-insensitive substring search across name, category and notes.
    pub fn search_resources(
        &mut self,
        owner_id: &str,
        search: &str,
    ) -> Result<Vec<Resource>, ResourceServiceError> {
        let resources = self.resources(owner_id)?;
        Ok(query::search_text(&resources, search, |resource| {
            format!(
                "{}\n{}\n{}",
                resource.name, resource.category, resource.notes
            )
        }))
    }

    /// Resources marked as favorite.
    pub fn favorites(&mut self, owner_id: &str) -> Result<Vec<Resource>, ResourceServiceError> {
        let mut resources = self.resources(owner_id)?;
        resources.retain(|resource| resource.is_favorite);
        Ok(resources)
    }

    /// Distinct normalized categories across one owner's resources, sorted.
    pub fn categories(&mut self, owner_id: &str) -> Result<Vec<String>, ResourceServiceError> {
        let resources = self.resources(owner_id)?;
        let mut categories: Vec<String> = resources
            .iter()
            .map(|resource| normalize_category(&resource.category))
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Applies a partial update; fails with `ResourceNotFound` for unknown ids.
    pub fn update_resource(
        &mut self,
        owner_id: &str,
        id: &str,
        patch: ResourcePatch,
    ) -> Result<Resource, ResourceServiceError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ResourceServiceError::InvalidResource(
                    "name cannot be empty".to_string(),
                ));
            }
        }
        Ok(self.engine.update_record(owner_id, id, move |resource| {
            if let Some(name) = patch.name {
                resource.name = name.trim().to_string();
            }
            if let Some(category) = patch.category {
                resource.category = normalize_category(&category);
            }
            if let Some(rating) = patch.rating {
                resource.rating = rating;
            }
            if let Some(notes) = patch.notes {
                resource.notes = notes;
            }
        })?)
    }

    /// Flips the favorite flag (read-modify-write over one update).
    pub fn toggle_favorite(
        &mut self,
        owner_id: &str,
        id: &str,
    ) -> Result<Resource, ResourceServiceError> {
        Ok(self.engine.update_record(owner_id, id, |resource| {
            resource.is_favorite = !resource.is_favorite;
        })?)
    }

    /// Deletes one resource; missing ids are a benign no-op.
    pub fn delete_resource(
        &mut self,
        owner_id: &str,
        id: &str,
    ) -> Result<(), ResourceServiceError> {
        Ok(self.engine.delete_record(owner_id, id)?)
    }

    /// Repairs a corrupt local blob (rebuild from remote, else reset empty).
    pub fn repair_local_store(
        &mut self,
        owner_id: &str,
    ) -> Result<RepairOutcome, ResourceServiceError> {
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

fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}
