//! Repository layer over the JSON store.
//!
//! # Responsibility
//! - Provide record-level CRUD on top of whole-file topic storage.
//! - Keep file layout and locking details out of the services.
//!
//! # Invariants
//! - Writes sanitize and validate a record before it is persisted.
//! - Reads reject files with non-positive or duplicate ids.
//! - Semantic errors (`NotFound`) are distinct from storage failures.

pub mod record_repo;
pub mod settings_repo;
