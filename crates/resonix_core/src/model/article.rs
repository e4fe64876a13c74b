//! Dated publications: news articles (`news.json`) and blog posts (`blog.json`).

use super::record::{
    parse_record_date, sanitize_extra, sanitize_in_place, Checks, ExtraFields, Record, RecordId,
    Topic, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Visibility of news and blog entries. Missing means published.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Published,
    Draft,
    Archived,
    #[serde(untagged)]
    Other(String),
}

/// Shared read access used by the featured-plus-page listing.
pub trait Dated {
    fn published_on(&self) -> Option<NaiveDate>;
    fn is_published(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    /// Free-form type such as `announcement` or `achievement`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Dated for NewsArticle {
    fn published_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }

    fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

impl Record for NewsArticle {
    const TOPIC: Topic = Topic::News;
    const LABEL: &'static str = "News article";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(&self.title, "News title is required")
            .require_date(&self.date, "News")
            .finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.title);
        sanitize_in_place(&mut self.kind);
        self.date = self.date.trim().to_string();
        sanitize_extra(&mut self.extra);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub status: PublishStatus,
    /// Read counter used to rank popular posts.
    #[serde(default)]
    pub views: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Dated for BlogPost {
    fn published_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }

    fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

impl Record for BlogPost {
    const TOPIC: Topic = Topic::Blog;
    const LABEL: &'static str = "Blog post";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(&self.title, "Blog title is required")
            .require_date(&self.date, "Blog")
            .require(&self.author, "Blog author is required")
            .finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.title);
        sanitize_in_place(&mut self.category);
        sanitize_in_place(&mut self.author);
        self.date = self.date.trim().to_string();
        sanitize_extra(&mut self.extra);
    }
}
