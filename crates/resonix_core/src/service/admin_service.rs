//! Admin dashboard use-cases.
//!
//! # Responsibility
//! - Serve unfiltered listings and dashboard counters.
//! - Create, replace, delete, and approve records on behalf of a signed-in user.
//! - Record every successful mutation in the activity log.
//!
//! # Invariants
//! - Callers authenticate before reaching this service; `user` is trusted.
//! - `update` replaces the whole record; omitted optional fields are dropped.

use super::activity::{ActivityEntry, ActivityLog};
use super::{ServiceError, ServiceResult};
use crate::model::event::Event;
use crate::model::member::Member;
use crate::model::project::{Project, ProjectStatus};
use crate::model::record::{Record, RecordId, Topic};
use crate::model::Settings;
use crate::repo::record_repo::{JsonRecordRepository, RecordRepository};
use crate::repo::settings_repo::SettingsRepository;
use crate::store::JsonStore;
use chrono::{NaiveDate, Utc};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_events: usize,
    pub total_projects: usize,
    pub total_members: usize,
    /// No contact inbox is stored; always zero.
    pub total_messages: usize,
    pub active_events: usize,
    pub published_projects: usize,
}

/// Reads an id from a JSON value: a positive integer or a numeric string.
pub fn parse_record_id(raw: Option<&Value>) -> Option<RecordId> {
    let id = match raw? {
        Value::Number(number) => number.as_i64()?,
        Value::String(text) => text.trim().parse::<RecordId>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

pub struct AdminService {
    store: Arc<JsonStore>,
    activity: ActivityLog,
}

impl AdminService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            activity: ActivityLog::default(),
        }
    }

    pub fn stats(&self, today: NaiveDate) -> ServiceResult<AdminStats> {
        let events = self.list_all::<Event>()?;
        let projects = self.list_all::<Project>()?;
        Ok(AdminStats {
            total_events: events.len(),
            total_projects: projects.len(),
            total_members: self.list_all::<Member>()?.len(),
            total_messages: 0,
            active_events: events.iter().filter(|event| event.is_upcoming(today)).count(),
            published_projects: projects.iter().filter(|project| project.is_published()).count(),
        })
    }

    pub fn recent_activities(&self) -> Vec<ActivityEntry> {
        self.activity.recent()
    }

    /// Every record of a topic in file order.
    pub fn list_all<T: Record>(&self) -> ServiceResult<Vec<T>> {
        Ok(self.repo::<T>().list()?)
    }

    /// All events, each carrying a `registration_count` (0 when never recorded).
    pub fn list_events(&self) -> ServiceResult<Vec<Event>> {
        let mut events = self.list_all::<Event>()?;
        for event in &mut events {
            if event.registration_count.is_none() {
                event.registration_count = Some(0);
            }
        }
        Ok(events)
    }

    pub fn create<T: Record>(&self, payload: Value, user: &str) -> ServiceResult<T> {
        let mut record = decode_payload::<T>(payload)?;
        record.set_id(0);
        let stored = self.repo::<T>().create(record)?;
        self.note(T::TOPIC, "create", format!("{} #{} was created", T::LABEL, stored.id()), user);
        Ok(stored)
    }

    /// Replaces the record `id` with `payload`.
    pub fn update<T: Record>(
        &self,
        id: Option<RecordId>,
        payload: Value,
        user: &str,
    ) -> ServiceResult<T> {
        let id = require_id::<T>(id)?;
        let mut record = decode_payload::<T>(payload)?;
        record.set_id(id);
        let stored = self.repo::<T>().update(record)?;
        self.note(T::TOPIC, "update", format!("{} #{id} was updated", T::LABEL), user);
        Ok(stored)
    }

    pub fn delete<T: Record>(&self, id: Option<RecordId>, user: &str) -> ServiceResult<T> {
        let id = require_id::<T>(id)?;
        let removed = self.repo::<T>().delete(id)?;
        self.note(T::TOPIC, "delete", format!("{} #{id} was deleted", T::LABEL), user);
        Ok(removed)
    }

    /// Marks a project published.
    pub fn approve_project(&self, id: Option<RecordId>, user: &str) -> ServiceResult<Project> {
        let id = require_id::<Project>(id)?;
        let project = self
            .repo::<Project>()
            .modify(id, |project| project.status = ProjectStatus::Published)?;
        self.note(Topic::Projects, "approve", format!("Project #{id} was approved"), user);
        Ok(project)
    }

    /// Merges `settings` into the stored object.
    ///
    /// # Errors
    /// - `InvalidInput` when `kind` is blank or `settings` is not a non-empty object.
    pub fn save_settings(&self, kind: &str, settings: Value, user: &str) -> ServiceResult<Settings> {
        let invalid = || ServiceError::InvalidInput("Invalid settings data".to_string());
        if kind.trim().is_empty() {
            return Err(invalid());
        }
        let changes = match settings {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(invalid()),
        };
        let merged = SettingsRepository::new(&self.store).merge(changes)?;
        self.note(
            Topic::Settings,
            "update",
            format!("{} settings were saved", kind.trim()),
            user,
        );
        Ok(merged)
    }

    fn repo<T: Record>(&self) -> JsonRecordRepository<'_, T> {
        JsonRecordRepository::new(&self.store)
    }

    fn note(&self, topic: Topic, action: &str, description: String, user: &str) {
        info!(
            "event=admin_{} module=service status=ok topic={} user={}",
            action, topic, user
        );
        self.activity
            .record(topic.id_noun(), action, description, user, Utc::now());
    }
}

fn require_id<T: Record>(id: Option<RecordId>) -> ServiceResult<RecordId> {
    id.filter(|id| *id > 0)
        .ok_or(ServiceError::InvalidId(T::TOPIC))
}

/// Decodes record fields. Any client-sent `id` is dropped; callers assign the id.
fn decode_payload<T: Record>(payload: Value) -> ServiceResult<T> {
    let Value::Object(mut fields) = payload else {
        return Err(ServiceError::InvalidInput(format!(
            "Invalid {} data",
            T::TOPIC.id_noun()
        )));
    };
    fields.remove("id");
    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        ServiceError::InvalidInput(format!("Invalid {} data: {err}", T::TOPIC.id_noun()))
    })
}
