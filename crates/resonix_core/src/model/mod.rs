//! Typed records for the site's JSON topics.
//!
//! # Responsibility
//! - Give each topic a typed shape for the fields business logic reads.
//! - Preserve every other field verbatim through `extra`.
//!
//! # Invariants
//! - Enumerated fields (status, media type) keep unlisted values verbatim.
//! - Settings stay a free-form JSON object.

pub mod article;
pub mod event;
pub mod gallery;
pub mod member;
pub mod project;
pub mod record;

/// Site settings object (`settings.json`).
pub type Settings = serde_json::Map<String, serde_json::Value>;
