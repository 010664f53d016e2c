//! Discussion group model matching the frontend Group interface.

use serde::{Deserialize, Serialize};

/// A recurring weekly discussion cohort with a fixed participant roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionGroup {
    pub id: String,
    /// Round (cohort offering) this group belongs to
    pub round_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Participants currently assigned to the group roster
    #[serde(default)]
    pub participant_ids: Vec<String>,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for creating a new discussion group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub round_id: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub participant_ids: Vec<String>,
}

/// Request body for updating an existing discussion group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub participant_ids: Option<Vec<String>>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}
