//! Domain service facades.
//!
//! # Responsibility
//! - Public per-domain API surface over one sync engine instance each:
//!   domain queries, toggle helpers, repair, sign-out.
//! - Keep UI/shell layers decoupled from engine and storage details.
//!
//! # See also
//! - docs/architecture/offline-storage.md

pub mod board;
pub mod journal;
pub mod resource;
