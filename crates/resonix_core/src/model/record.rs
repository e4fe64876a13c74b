//! Shared record contract for every list topic.
//!
//! # Responsibility
//! - Name the topics and their backing files.
//! - Define what a storable record must provide (id, validation, sanitizing).
//!
//! # Invariants
//! - Persisted ids are strictly positive.
//! - Fields not modelled by a record type survive a read/write cycle unchanged.

use crate::input::sanitize_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier carried by every record.
pub type RecordId = i64;

/// Unmodelled record fields, kept verbatim.
pub type ExtraFields = Map<String, Value>;

/// One JSON file in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    Events,
    Projects,
    Team,
    News,
    Blog,
    Gallery,
    Settings,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Events,
        Topic::Projects,
        Topic::Team,
        Topic::News,
        Topic::Blog,
        Topic::Gallery,
        Topic::Settings,
    ];

    /// Stable file stem, also used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Projects => "projects",
            Self::Team => "team",
            Self::News => "news",
            Self::Blog => "blog",
            Self::Gallery => "gallery",
            Self::Settings => "settings",
        }
    }

    /// Noun used in "Invalid <noun> ID" messages.
    pub fn id_noun(self) -> &'static str {
        match self {
            Self::Events => "event",
            Self::Projects => "project",
            Self::Team => "member",
            Self::News => "news",
            Self::Blog => "blog",
            Self::Gallery => "gallery",
            Self::Settings => "settings",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Whether the file holds a JSON array (everything but settings).
    pub fn is_list(self) -> bool {
        !matches!(self, Self::Settings)
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collected field problems for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages.join("; "))
    }
}

impl Error for ValidationError {}

/// A record stored in one list topic.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TOPIC: Topic;
    /// Human label used in messages ("Event", "Project", ...).
    const LABEL: &'static str;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);

    /// Checks required fields. Ids are checked by the repository.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Normalizes free-text fields before persistence.
    fn sanitize(&mut self);
}

/// Accumulates validation messages in field order.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    messages: Vec<String>,
}

impl Checks {
    pub(crate) fn require(&mut self, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.messages.push(message.to_string());
        }
        self
    }

    pub(crate) fn require_date(&mut self, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.messages.push(format!("{label} date is required"));
        } else if parse_record_date(value).is_none() {
            self.messages.push(format!("Invalid {} date format", label.to_lowercase()));
        }
        self
    }

    pub(crate) fn push(&mut self, message: impl Into<String>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(std::mem::take(&mut self.messages)))
        }
    }
}

/// Parses the date formats found in the data files.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC 3339.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|value| value.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|value| value.date_naive())
        })
}

pub(crate) fn sanitize_in_place(value: &mut String) {
    *value = sanitize_text(value);
}

pub(crate) fn sanitize_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        sanitize_in_place(inner);
    }
}

/// Sanitizes top-level string values of unmodelled fields.
pub(crate) fn sanitize_extra(extra: &mut ExtraFields) {
    for value in extra.values_mut() {
        if let Value::String(text) = value {
            sanitize_in_place(text);
        }
    }
}
