//! Site configuration.
//!
//! # Responsibility
//! - Carry the tunables the services and HTTP layer read at runtime.
//! - Load overrides from an optional JSON file; every field has a default.
//!
//! # Invariants
//! - `default_items_per_page <= max_items_per_page` after `load`.
//! - The credential table is never empty after `load`.

use crate::model::Settings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const APP_NAME: &str = "Resonix Society";
pub const ADMIN_SESSION_TIMEOUT_SECS: u64 = 3600;
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
pub const LOGIN_LOCKOUT_SECS: u64 = 900;
pub const REMEMBER_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 6;
pub const MAX_ITEMS_PER_PAGE: u32 = 50;

/// Deployment flavor; only affects how much detail error envelopes carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppEnv {
    Development,
    Production,
}

/// Contact block used when `settings.json` has no contact keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            email: "info@resonixsociety.org".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "Electronics Department, University Campus, Room 301, ECE Block".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub app_name: String,
    pub app_env: AppEnv,
    /// Seconds a session stays valid after login.
    pub session_timeout_secs: u64,
    pub max_login_attempts: u32,
    pub login_lockout_secs: u64,
    pub remember_token_ttl_secs: u64,
    pub default_items_per_page: u32,
    pub max_items_per_page: u32,
    /// Origins echoed back in `Access-Control-Allow-Origin`.
    pub allowed_origins: Vec<String>,
    /// Username to plaintext password.
    pub admin_users: BTreeMap<String, String>,
    pub contact: ContactInfo,
    /// Platform name to profile URL, served as `<platform>_url`.
    pub social_links: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            app_env: AppEnv::Development,
            session_timeout_secs: ADMIN_SESSION_TIMEOUT_SECS,
            max_login_attempts: MAX_LOGIN_ATTEMPTS,
            login_lockout_secs: LOGIN_LOCKOUT_SECS,
            remember_token_ttl_secs: REMEMBER_TOKEN_TTL_SECS,
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            max_items_per_page: MAX_ITEMS_PER_PAGE,
            allowed_origins: [
                "http://localhost",
                "http://localhost:5000",
                "http://127.0.0.1:5000",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            admin_users: string_map(&[("admin", "admin123"), ("moderator", "mod123")]),
            contact: ContactInfo::default(),
            social_links: string_map(&[
                ("facebook", "https://facebook.com/resonixsociety"),
                ("twitter", "https://twitter.com/resonixsociety"),
                ("instagram", "https://instagram.com/resonixsociety"),
                ("linkedin", "https://linkedin.com/company/resonixsociety"),
            ]),
        }
    }
}

impl SiteConfig {
    /// Reads a JSON config file, filling unspecified fields with defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            source: err,
        })?;
        let config: SiteConfig =
            serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
                path: path.display().to_string(),
                source: err,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items_per_page == 0 {
            return Err(ConfigError::Invalid(
                "max_items_per_page must be at least 1".to_string(),
            ));
        }
        if self.default_items_per_page == 0
            || self.default_items_per_page > self.max_items_per_page
        {
            return Err(ConfigError::Invalid(format!(
                "default_items_per_page must be within 1..={}",
                self.max_items_per_page
            )));
        }
        if self.admin_users.is_empty() {
            return Err(ConfigError::Invalid(
                "admin_users must contain at least one account".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// Settings served for keys the admin has not saved yet.
    pub fn default_settings(&self) -> Settings {
        let mut defaults = Settings::new();
        let mut put = |key: String, value: &str| {
            defaults.insert(key, Value::String(value.to_string()));
        };
        put("society_name".to_string(), &self.app_name);
        put("contact_email".to_string(), &self.contact.email);
        put("contact_phone".to_string(), &self.contact.phone);
        put("address".to_string(), &self.contact.address);
        for (platform, url) in &self.social_links {
            put(format!("{platform}_url"), url);
        }
        defaults
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read config `{path}`: {source}"),
            Self::Parse { path, source } => write!(f, "invalid config `{path}`: {source}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppEnv, ConfigError, SiteConfig};
    use std::io::Write;

    #[test]
    fn defaults_mirror_site_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.session_timeout_secs, 3600);
        assert_eq!(config.max_login_attempts, 5);
        assert_eq!(config.login_lockout_secs, 900);
        assert_eq!(config.default_items_per_page, 6);
        assert_eq!(config.max_items_per_page, 50);
        assert_eq!(config.admin_users.get("admin").map(String::as_str), Some("admin123"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"app_env":"production","max_items_per_page":20}}"#).expect("write");

        let config = SiteConfig::load(file.path()).expect("config should load");
        assert_eq!(config.app_env, AppEnv::Production);
        assert_eq!(config.max_items_per_page, 20);
        assert_eq!(config.default_items_per_page, 6);
        assert!(config.is_origin_allowed("http://localhost:5000"));
        assert!(!config.is_origin_allowed("https://evil.example"));
    }

    #[test]
    fn default_settings_use_admin_form_keys() {
        let mut config = SiteConfig::default();
        config.app_name = "Resonix ECE".to_string();
        let defaults = config.default_settings();
        assert_eq!(defaults["society_name"], "Resonix ECE");
        assert_eq!(defaults["contact_email"], "info@resonixsociety.org");
        assert_eq!(defaults["linkedin_url"], "https://linkedin.com/company/resonixsociety");
        assert_eq!(defaults.len(), 8);
    }

    #[test]
    fn load_rejects_inconsistent_pagination() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"default_items_per_page":10,"max_items_per_page":5}}"#).expect("write");

        let err = SiteConfig::load(file.path()).expect_err("pagination bounds must be checked");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");

        let err = SiteConfig::load(file.path()).expect_err("malformed config must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config"));
    }
}
