//! Generic record repository and its JSON-file implementation.

use crate::model::record::{Record, RecordId, ValidationError};
use crate::store::{JsonStore, StoreError};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Store(StoreError),
    NotFound { label: &'static str, id: RecordId },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound { label, id } => write!(f, "{label} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// CRUD contract for one list topic.
pub trait RecordRepository<T: Record> {
    /// All records in file order.
    fn list(&self) -> RepoResult<Vec<T>>;
    fn get(&self, id: RecordId) -> RepoResult<Option<T>>;
    /// Assigns the next id and appends. Returns the stored record.
    fn create(&self, record: T) -> RepoResult<T>;
    /// Replaces the record with the same id. Returns the stored record.
    fn update(&self, record: T) -> RepoResult<T>;
    /// Removes a record. Returns what was removed.
    fn delete(&self, id: RecordId) -> RepoResult<T>;
    /// Mutates one record in place without re-validating untouched fields.
    fn modify<F>(&self, id: RecordId, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut T);
}

/// Record repository backed by one topic file.
pub struct JsonRecordRepository<'store, T> {
    store: &'store JsonStore,
    _record: PhantomData<fn() -> T>,
}

impl<'store, T: Record> JsonRecordRepository<'store, T> {
    pub fn new(store: &'store JsonStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

impl<T: Record> RecordRepository<T> for JsonRecordRepository<'_, T> {
    fn list(&self) -> RepoResult<Vec<T>> {
        let records: Vec<T> = self.store.load_list(T::TOPIC)?;
        check_ids(&records)?;
        Ok(records)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|record| record.id() == id))
    }

    fn create(&self, mut record: T) -> RepoResult<T> {
        record.sanitize();
        record.validate()?;

        let stored = self.store.update_list(T::TOPIC, |records: &mut Vec<T>| {
            check_ids(records)?;
            let next_id = records.iter().map(T::id).max().unwrap_or(0) + 1;
            record.set_id(next_id);
            records.push(record.clone());
            Ok::<_, RepoError>(record)
        })?;

        info!(
            "event=record_create module=repo status=ok topic={} id={}",
            T::TOPIC,
            stored.id()
        );
        Ok(stored)
    }

    fn update(&self, mut record: T) -> RepoResult<T> {
        record.sanitize();
        record.validate()?;

        let id = record.id();
        let stored = self.store.update_list(T::TOPIC, |records: &mut Vec<T>| {
            check_ids(records)?;
            let slot = records
                .iter_mut()
                .find(|existing| existing.id() == id)
                .ok_or(RepoError::NotFound {
                    label: T::LABEL,
                    id,
                })?;
            *slot = record.clone();
            Ok::<_, RepoError>(record)
        })?;

        info!(
            "event=record_update module=repo status=ok topic={} id={}",
            T::TOPIC,
            id
        );
        Ok(stored)
    }

    fn delete(&self, id: RecordId) -> RepoResult<T> {
        let removed = self.store.update_list(T::TOPIC, |records: &mut Vec<T>| {
            check_ids(records)?;
            let index = records
                .iter()
                .position(|existing| existing.id() == id)
                .ok_or(RepoError::NotFound {
                    label: T::LABEL,
                    id,
                })?;
            Ok::<_, RepoError>(records.remove(index))
        })?;

        info!(
            "event=record_delete module=repo status=ok topic={} id={}",
            T::TOPIC,
            id
        );
        Ok(removed)
    }

    fn modify<F>(&self, id: RecordId, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut T),
    {
        self.store.update_list(T::TOPIC, |records: &mut Vec<T>| {
            check_ids(records)?;
            let slot = records
                .iter_mut()
                .find(|existing| existing.id() == id)
                .ok_or(RepoError::NotFound {
                    label: T::LABEL,
                    id,
                })?;
            apply(slot);
            Ok::<_, RepoError>(slot.clone())
        })
    }
}

fn check_ids<T: Record>(records: &[T]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if id <= 0 {
            return Err(RepoError::InvalidData(format!(
                "non-positive id `{id}` in {}",
                T::TOPIC.file_name()
            )));
        }
        if !seen.insert(id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate id `{id}` in {}",
                T::TOPIC.file_name()
            )));
        }
    }
    Ok(())
}
