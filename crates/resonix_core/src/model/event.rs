//! Event records (`events.json`).

use super::record::{
    parse_record_date, sanitize_extra, sanitize_in_place, sanitize_optional, Checks, ExtraFields,
    Record, RecordId, Topic, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Event type counted separately on the landing page.
pub const WORKSHOP_EVENT_TYPE: &str = "workshop";

/// Only `Active` events count as upcoming. Other values are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Active,
    Cancelled,
    Completed,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    /// Kept as written; see [`Event::date`] for the parsed value.
    #[serde(default)]
    pub date: String,
    /// Free-form type such as `workshop`, `seminar`, `competition`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_count: Option<u32>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Event {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }

    pub fn is_workshop(&self) -> bool {
        self.kind == WORKSHOP_EVENT_TYPE
    }

    /// Active and dated `today` or later.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.status == EventStatus::Active && self.date().is_some_and(|date| date >= today)
    }
}

impl Record for Event {
    const TOPIC: Topic = Topic::Events;
    const LABEL: &'static str = "Event";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(&self.title, "Event title is required")
            .require_date(&self.date, "Event")
            .require(&self.kind, "Event type is required")
            .finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.title);
        sanitize_in_place(&mut self.kind);
        self.date = self.date.trim().to_string();
        sanitize_optional(&mut self.time);
        sanitize_optional(&mut self.location);
        sanitize_optional(&mut self.description);
        sanitize_extra(&mut self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventStatus};
    use crate::model::record::Record;
    use chrono::NaiveDate;
    use serde_json::json;

    fn event(date: &str, status: EventStatus) -> Event {
        let mut event: Event = serde_json::from_value(json!({
            "id": 1,
            "title": "IoT with Arduino",
            "date": date,
            "type": "workshop"
        }))
        .expect("event should parse");
        event.status = status;
        event
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let value = json!({
            "id": 3,
            "title": "Hackathon",
            "date": "2025-05-01",
            "type": "competition",
            "requirements": ["laptop"],
            "image": "hack.png"
        });
        let event: Event = serde_json::from_value(value).expect("event should parse");
        assert_eq!(event.status, EventStatus::Active);
        let back = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(back["requirements"], json!(["laptop"]));
        assert_eq!(back["image"], "hack.png");
        assert_eq!(back["type"], "competition");
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let event: Event = serde_json::from_value(json!({"date": "soon"})).expect("parse");
        let err = event.validate().expect_err("event should be invalid");
        assert_eq!(
            err.messages,
            vec![
                "Event title is required".to_string(),
                "Invalid event date format".to_string(),
                "Event type is required".to_string(),
            ]
        );
    }

    #[test]
    fn upcoming_requires_active_status_and_future_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("date");
        assert!(event("2025-06-01", EventStatus::Active).is_upcoming(today));
        assert!(!event("2025-05-31", EventStatus::Active).is_upcoming(today));
        assert!(!event("2025-07-01", EventStatus::Cancelled).is_upcoming(today));
        assert!(!event("2025-07-01", EventStatus::Other("upcoming".to_string())).is_upcoming(today));
        assert!(event("2025-07-01", EventStatus::Active).is_workshop());
    }
}
