//! Core domain logic for the Resonix Society site.
//! Typed records, flat-file storage, and the content, admin, and auth use-cases.

pub mod auth;
pub mod config;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use auth::{AdminUser, AuthCheck, AuthError, LoginOutcome, SessionManager, Token};
pub use config::{AppEnv, ConfigError, SiteConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogEcho};
pub use model::article::{BlogPost, NewsArticle, PublishStatus};
pub use model::event::{Event, EventStatus};
pub use model::gallery::{GalleryItem, MediaKind};
pub use model::member::{Member, MemberStatus};
pub use model::project::{Project, ProjectStatus};
pub use model::record::{Record, RecordId, Topic, ValidationError};
pub use model::Settings;
pub use repo::record_repo::{JsonRecordRepository, RecordRepository, RepoError, RepoResult};
pub use repo::settings_repo::SettingsRepository;
pub use service::activity::ActivityEntry;
pub use service::admin_service::{parse_record_id, AdminService, AdminStats};
pub use service::content_service::{AuthorCount, ContentService, FeaturedPage, ListQuery, SiteStats};
pub use service::pagination::{top_limit, PageRequest};
pub use service::{ServiceError, ServiceResult};
pub use store::{open_store, JsonStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
