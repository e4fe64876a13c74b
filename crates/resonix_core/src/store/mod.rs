//! Flat-file JSON storage.
//!
//! # Responsibility
//! - Open a data directory and make sure every topic file exists.
//! - Read and atomically rewrite one topic file at a time.
//!
//! # Invariants
//! - A topic file is either the previous or the next full document, never partial.
//! - Read-modify-write cycles on one topic are serialized within the process.
//! - Malformed files are reported, never silently replaced.

use crate::model::record::Topic;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_store;
mod open;

pub use json_store::JsonStore;
pub use open::open_store;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    MissingFile(Topic),
    Io {
        topic: Option<Topic>,
        source: std::io::Error,
    },
    Malformed {
        topic: Topic,
        source: serde_json::Error,
    },
    Encode {
        topic: Topic,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(topic: Topic, source: std::io::Error) -> Self {
        Self::Io {
            topic: Some(topic),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile(topic) => write!(f, "data file not found: {}", topic.file_name()),
            Self::Io {
                topic: Some(topic),
                source,
            } => write!(f, "failed to access data file {}: {source}", topic.file_name()),
            Self::Io {
                topic: None,
                source,
            } => write!(f, "failed to access data directory: {source}"),
            Self::Malformed { topic, source } => {
                write!(f, "invalid JSON in data file {}: {source}", topic.file_name())
            }
            Self::Encode { topic, source } => {
                write!(f, "failed to encode JSON for {}: {source}", topic.file_name())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingFile(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
        }
    }
}
