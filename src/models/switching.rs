//! Switch request model for participants moving between discussion groups.

use serde::{Deserialize, Serialize};

/// A recorded request by a participant to switch into another group.
///
/// Requests are reviewed by facilitators; recording one does not move the
/// participant between rosters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRequest {
    pub id: String,
    pub round_id: String,
    pub participant_id: String,
    /// Group the participant is leaving, if they are currently in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_group_id: Option<String>,
    /// Group the participant wants to join
    pub to_group_id: String,
    /// Specific occurrence the participant picked, when they chose one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_discussion_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: String,
}

/// Request body for submitting a switch request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwitchRequest {
    pub to_group_id: String,
    #[serde(default)]
    pub to_discussion_id: Option<String>,
    #[serde(default)]
    pub from_group_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
