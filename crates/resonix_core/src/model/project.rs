//! Project records (`projects.json`).

use super::record::{
    sanitize_extra, sanitize_in_place, Checks, ExtraFields, Record, RecordId, Topic,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Lifecycle of a submitted project. Only `Published` is publicly visible.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Published,
    #[default]
    Pending,
    Draft,
    Archived,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Project {
    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }
}

impl Record for Project {
    const TOPIC: Topic = Topic::Projects;
    const LABEL: &'static str = "Project";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Checks::default()
            .require(&self.title, "Project title is required")
            .require(&self.category, "Project category is required")
            .require(&self.description, "Project description is required")
            .finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.title);
        sanitize_in_place(&mut self.category);
        sanitize_in_place(&mut self.description);
        sanitize_extra(&mut self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectStatus};
    use serde_json::json;

    #[test]
    fn missing_status_is_pending_and_not_public() {
        let project: Project = serde_json::from_value(json!({
            "id": 2,
            "title": "Smart Home",
            "category": "iot",
            "description": "Automation hub"
        }))
        .expect("project should parse");
        assert_eq!(project.status, ProjectStatus::Pending);
        assert!(!project.is_published());
    }

    #[test]
    fn unlisted_status_is_kept_and_not_public() {
        let project: Project = serde_json::from_value(json!({"id": 1, "status": "approved"}))
            .expect("project should parse");
        assert_eq!(project.status, ProjectStatus::Other("approved".to_string()));
        assert!(!project.is_published());
        let back = serde_json::to_value(&project).expect("project should serialize");
        assert_eq!(back["status"], json!("approved"));
    }
}
