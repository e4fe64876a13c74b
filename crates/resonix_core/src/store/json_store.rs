//! Topic file access with per-topic write serialization.

use super::{StoreError, StoreResult};
use crate::model::record::Topic;
use crate::model::Settings;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Existing data files are indented with four spaces.
const JSON_INDENT: &[u8] = b"    ";

/// Handle over one data directory.
///
/// Cheap to share behind `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    /// Indexed by `Topic as usize`.
    locks: [Mutex<()>; Topic::ALL.len()],
}

impl JsonStore {
    pub(super) fn new(root: PathBuf) -> Self {
        Self {
            root,
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn path_of(&self, topic: Topic) -> PathBuf {
        self.root.join(topic.file_name())
    }

    /// Reads a list topic.
    pub fn load_list<T: DeserializeOwned>(&self, topic: Topic) -> StoreResult<Vec<T>> {
        self.read_json(topic)
    }

    /// Reads the settings object.
    pub fn load_settings(&self) -> StoreResult<Settings> {
        self.read_json(Topic::Settings)
    }

    /// Replaces a list topic wholesale.
    pub fn save_list<T: Serialize>(&self, topic: Topic, items: &[T]) -> StoreResult<()> {
        let _guard = self.lock(topic);
        self.write_json(topic, items)
    }

    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let _guard = self.lock(Topic::Settings);
        self.write_json(Topic::Settings, settings)
    }

    /// Loads, mutates, and rewrites a list topic under its lock.
    ///
    /// The file is rewritten only when `apply` returns `Ok`.
    pub fn update_list<T, R, E>(
        &self,
        topic: Topic,
        apply: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: DeserializeOwned + Serialize,
        E: From<StoreError>,
    {
        let _guard = self.lock(topic);
        let mut items: Vec<T> = self.read_json(topic)?;
        let outcome = apply(&mut items)?;
        self.write_json(topic, &items)?;
        Ok(outcome)
    }

    /// Loads, mutates, and rewrites the settings object under its lock.
    pub fn update_settings<R, E>(
        &self,
        apply: impl FnOnce(&mut Settings) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock(Topic::Settings);
        let mut settings: Settings = self.read_json(Topic::Settings)?;
        let outcome = apply(&mut settings)?;
        self.write_json(Topic::Settings, &settings)?;
        Ok(outcome)
    }

    fn lock(&self, topic: Topic) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.locks[topic as usize]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_json<T: DeserializeOwned>(&self, topic: Topic) -> StoreResult<T> {
        let path = self.path_of(topic);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingFile(topic));
            }
            Err(err) => return Err(StoreError::io(topic, err)),
        };
        debug!(
            "event=store_read module=store status=ok topic={} bytes={}",
            topic,
            raw.len()
        );
        serde_json::from_slice(&raw).map_err(|source| StoreError::Malformed { topic, source })
    }

    fn write_json<T: Serialize + ?Sized>(&self, topic: Topic, value: &T) -> StoreResult<()> {
        let mut encoded = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut encoded, PrettyFormatter::with_indent(JSON_INDENT));
        value
            .serialize(&mut serializer)
            .map_err(|source| StoreError::Encode { topic, source })?;

        let mut staged =
            NamedTempFile::new_in(&self.root).map_err(|err| StoreError::io(topic, err))?;
        staged
            .write_all(&encoded)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| StoreError::io(topic, err))?;
        staged
            .persist(self.path_of(topic))
            .map_err(|err| StoreError::io(topic, err.error))?;

        debug!(
            "event=store_write module=store status=ok topic={} bytes={}",
            topic,
            encoded.len()
        );
        Ok(())
    }
}
