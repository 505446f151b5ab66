//! Domain models shared by the sync engine and service facades.
//!
//! # Responsibility
//! - Define the three record shapes synced by the app (journal entries,
//!   personal resources, vision-board items).
//! - Define the `DomainRecord` contract the generic engine operates on.
//!
//! # Invariants
//! - Every record carries a stable `id` plus the `owner_id` that scopes it.
//! - Timestamps are UTC and serialize as RFC 3339 strings.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod board;
pub mod journal;
pub mod record;
pub mod resource;
