//! Team roster records (`team.json`).

use super::record::{
    sanitize_extra, sanitize_in_place, sanitize_optional, Checks, ExtraFields, Record, RecordId,
    Topic, ValidationError,
};
use crate::input::is_valid_email;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Alumni,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

impl Record for Member {
    const TOPIC: Topic = Topic::Team;
    const LABEL: &'static str = "Team member";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::default();
        checks
            .require(&self.name, "Member name is required")
            .require(&self.role, "Member role is required");
        if let Some(email) = self.email.as_deref() {
            if !email.trim().is_empty() && !is_valid_email(email) {
                checks.push("Invalid email address");
            }
        }
        checks.finish()
    }

    fn sanitize(&mut self) {
        sanitize_in_place(&mut self.name);
        sanitize_in_place(&mut self.role);
        sanitize_optional(&mut self.email);
        sanitize_extra(&mut self.extra);
    }
}
