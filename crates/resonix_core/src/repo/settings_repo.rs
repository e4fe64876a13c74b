//! Settings object access.

use crate::model::Settings;
use crate::repo::record_repo::{RepoError, RepoResult};
use crate::store::JsonStore;
use log::info;

pub struct SettingsRepository<'store> {
    store: &'store JsonStore,
}

impl<'store> SettingsRepository<'store> {
    pub fn new(store: &'store JsonStore) -> Self {
        Self { store }
    }

    pub fn get(&self) -> RepoResult<Settings> {
        Ok(self.store.load_settings()?)
    }

    /// Overwrites the given keys and keeps every other key. Returns the merged object.
    pub fn merge(&self, changes: Settings) -> RepoResult<Settings> {
        let changed_keys = changes.len();
        let merged = self.store.update_settings(|current| {
            for (key, value) in changes {
                current.insert(key, value);
            }
            Ok::<_, RepoError>(current.clone())
        })?;
        info!(
            "event=settings_merge module=repo status=ok changed_keys={}",
            changed_keys
        );
        Ok(merged)
    }
}
