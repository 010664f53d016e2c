//! Output shapes for the group-switching availability query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DiscussionGroup, GroupDiscussion};

/// Display name used when the owning group has no name on record.
pub const UNKNOWN_GROUP_NAME: &str = "Group [Unknown]";

/// Aggregate availability for one group across its scheduled discussions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAvailability {
    pub group: DiscussionGroup,
    /// Whether the requesting participant is on the group roster
    pub user_is_participant: bool,
    /// Minimum remaining capacity across upcoming discussions; `None` when
    /// capacity is unknown or every discussion has already started
    pub spots_left_if_known: Option<u32>,
    /// True only when every one of the group's discussions has started
    pub is_too_late_to_switch_to: bool,
}

/// Availability for a single discussion occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionAvailability {
    pub discussion: GroupDiscussion,
    /// Owning group's display name, or [`UNKNOWN_GROUP_NAME`]
    pub group_name: String,
    /// Whether the requesting participant is expected at this occurrence
    pub user_is_participant: bool,
    /// Remaining capacity, clamped at zero; `None` when capacity is unknown
    pub spots_left_if_known: Option<u32>,
    pub has_started: bool,
}

/// Result of the availability query: group-level summaries plus discussion
/// occurrences bucketed by curriculum unit number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub groups_available: Vec<GroupAvailability>,
    /// Keyed by stringified unit number
    pub discussions_available: BTreeMap<String, Vec<DiscussionAvailability>>,
}
