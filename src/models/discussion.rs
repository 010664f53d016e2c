//! Group discussion model matching the frontend GroupDiscussion interface.

use serde::{Deserialize, Serialize};

/// One dated occurrence of a group tied to a specific curriculum unit.
///
/// `unit_number` is nullable: occurrences that are not pinned to a unit
/// (e.g. ad-hoc catch-up calls) never take part in switching availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDiscussion {
    pub id: String,
    /// Owning group
    pub group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<i64>,
    /// Scheduled start, unix seconds
    pub starts_at: i64,
    /// Scheduled end, unix seconds
    pub ends_at: i64,
    /// Participants expected to attend this occurrence
    #[serde(default)]
    pub attendee_ids: Vec<String>,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Request body for creating a new discussion occurrence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionRequest {
    pub group_id: String,
    #[serde(default)]
    pub unit_number: Option<i64>,
    pub starts_at: i64,
    pub ends_at: i64,
    #[serde(default)]
    pub attendee_ids: Vec<String>,
}
