//! Gallery records (`gallery.json`).

use super::record::{
    sanitize_extra, sanitize_in_place, sanitize_optional, Checks, ExtraFields, Record, RecordId,
    Topic, ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    /// Listed by neither gallery tab.
    #[serde(untagged)]
    Other(String),
}

impl MediaKind {
    /// Maps the public `type` query value: `videos` selects videos, anything else photos.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("videos") => Self::Video,
            _ => Self::Photo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Record for GalleryItem {
    const TOPIC: Topic = Topic::Gallery;
    const LABEL: &'static str = "Gallery item";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(&self.category, "Gallery category is required")
            .finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.category);
        sanitize_optional(&mut self.title);
        sanitize_extra(&mut self.extra);
    }
}
