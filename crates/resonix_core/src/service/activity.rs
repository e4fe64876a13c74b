//! Bounded, newest-first log of admin actions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const ACTIVITY_LOG_CAPACITY: usize = 100;

/// One admin action as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// Topic noun such as `event` or `settings`.
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    pub description: String,
    pub user: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub created_at: String,
}

#[derive(Debug)]
pub struct ActivityLog {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(ACTIVITY_LOG_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn record(
        &self,
        kind: &str,
        action: &str,
        description: impl Into<String>,
        user: &str,
        at: DateTime<Utc>,
    ) {
        let entry = ActivityEntry {
            kind: kind.to_string(),
            action: action.to_string(),
            description: description.into(),
            user: user.to_string(),
            created_at: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}
