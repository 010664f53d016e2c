//! Group-switching availability calculator.
//!
//! Pure aggregation over a round's groups and their scheduled discussions:
//! which groups a participant could still switch into, and which individual
//! occurrences exist per curriculum unit. No I/O and no failure cases; the
//! evaluation time is passed in so results are reproducible.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    AvailabilitySummary, DiscussionAvailability, DiscussionGroup, GroupAvailability,
    GroupDiscussion, UNKNOWN_GROUP_NAME,
};

/// A discussion that takes part in availability: pinned to a unit and owned
/// by a group that is in scope.
struct QualifyingDiscussion<'a> {
    discussion: &'a GroupDiscussion,
    group: &'a DiscussionGroup,
    unit_number: i64,
    has_started: bool,
    spots_left: Option<u32>,
}

/// Remaining capacity for one session, excluding the requesting participant
/// and clamped at zero. `None` when the capacity limit is unknown.
fn session_spots_left(
    max_participants: Option<u32>,
    attendee_ids: &[String],
    participant_id: &str,
) -> Option<u32> {
    max_participants.map(|cap| {
        let others = attendee_ids
            .iter()
            .filter(|id| id.as_str() != participant_id)
            .count() as u32;
        cap.saturating_sub(others)
    })
}

/// Compute switching availability for `participant_id` at time `now`
/// (unix seconds).
///
/// Discussions without a unit number, or whose owning group is not in
/// `groups`, are silently dropped from both views. A group appears in
/// `groups_available` only if it owns at least one qualifying discussion;
/// groups are reported in the order they were supplied.
pub fn calculate_group_availability(
    groups: &[DiscussionGroup],
    discussions: &[GroupDiscussion],
    max_participants: Option<u32>,
    participant_id: &str,
    now: i64,
) -> AvailabilitySummary {
    let groups_by_id: HashMap<&str, &DiscussionGroup> =
        groups.iter().map(|g| (g.id.as_str(), g)).collect();

    let qualifying: Vec<QualifyingDiscussion> = discussions
        .iter()
        .filter_map(|d| {
            let unit_number = d.unit_number?;
            let group = groups_by_id.get(d.group_id.as_str()).copied()?;
            Some(QualifyingDiscussion {
                discussion: d,
                group,
                unit_number,
                has_started: d.starts_at < now,
                spots_left: session_spots_left(max_participants, &d.attendee_ids, participant_id),
            })
        })
        .collect();

    let mut discussions_available: BTreeMap<String, Vec<DiscussionAvailability>> = BTreeMap::new();
    for q in &qualifying {
        discussions_available
            .entry(q.unit_number.to_string())
            .or_default()
            .push(DiscussionAvailability {
                discussion: q.discussion.clone(),
                group_name: q
                    .group
                    .group_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_GROUP_NAME.to_string()),
                user_is_participant: q
                    .discussion
                    .attendee_ids
                    .iter()
                    .any(|id| id.as_str() == participant_id),
                spots_left_if_known: q.spots_left,
                has_started: q.has_started,
            });
    }

    let groups_available = groups
        .iter()
        .filter_map(|group| {
            let sessions: Vec<&QualifyingDiscussion> = qualifying
                .iter()
                .filter(|q| q.group.id == group.id)
                .collect();
            if sessions.is_empty() {
                return None;
            }

            let is_too_late_to_switch_to = sessions.iter().all(|q| q.has_started);

            // Only sessions that have not started count toward capacity: a
            // group with nothing left to join reports `None`, not zero.
            let spots_left_if_known = sessions
                .iter()
                .filter(|q| !q.has_started)
                .filter_map(|q| q.spots_left)
                .min();

            Some(GroupAvailability {
                group: group.clone(),
                // Roster membership, not occurrence attendance. The two can
                // disagree on stale data and are reported as-is.
                user_is_participant: group
                    .participant_ids
                    .iter()
                    .any(|id| id.as_str() == participant_id),
                spots_left_if_known,
                is_too_late_to_switch_to,
            })
        })
        .collect();

    AvailabilitySummary {
        groups_available,
        discussions_available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const HOUR: i64 = 3_600;

    fn group(id: &str, name: Option<&str>, participant_ids: &[&str]) -> DiscussionGroup {
        DiscussionGroup {
            id: id.to_string(),
            round_id: "round-1".to_string(),
            group_name: name.map(|n| n.to_string()),
            participant_ids: participant_ids.iter().map(|p| p.to_string()).collect(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            version: 1,
        }
    }

    fn discussion(
        id: &str,
        group_id: &str,
        unit_number: Option<i64>,
        starts_at: i64,
        attendee_ids: &[&str],
    ) -> GroupDiscussion {
        GroupDiscussion {
            id: id.to_string(),
            group_id: group_id.to_string(),
            unit_number,
            starts_at,
            ends_at: starts_at + HOUR,
            attendee_ids: attendee_ids.iter().map(|p| p.to_string()).collect(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            version: 1,
        }
    }

    #[test]
    fn empty_inputs_yield_empty_outputs() {
        let summary = calculate_group_availability(&[], &[], Some(8), "p1", NOW);
        assert!(summary.groups_available.is_empty());
        assert!(summary.discussions_available.is_empty());
    }

    #[test]
    fn unitless_discussions_are_excluded() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![discussion("d1", "g1", None, NOW + HOUR, &[])];

        let summary = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);

        assert!(summary.discussions_available.is_empty());
        // The group has no other qualifying discussion, so it is absent too.
        assert!(summary.groups_available.is_empty());
    }

    #[test]
    fn discussions_of_unknown_groups_are_excluded() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW + HOUR, &[]),
            discussion("d2", "missing", Some(1), NOW + HOUR, &[]),
        ];

        let summary = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);

        let unit_one = &summary.discussions_available["1"];
        assert_eq!(unit_one.len(), 1);
        assert_eq!(unit_one[0].discussion.id, "d1");
        assert_eq!(summary.groups_available.len(), 1);
        assert_eq!(summary.groups_available[0].group.id, "g1");
    }

    #[test]
    fn spots_left_is_clamped_at_zero() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![discussion(
            "d1",
            "g1",
            Some(1),
            NOW + HOUR,
            &["a", "b", "c", "d", "e", "f"],
        )];

        let summary = calculate_group_availability(&groups, &discussions, Some(5), "p1", NOW);

        assert_eq!(
            summary.discussions_available["1"][0].spots_left_if_known,
            Some(0)
        );
        assert_eq!(summary.groups_available[0].spots_left_if_known, Some(0));
    }

    #[test]
    fn requester_is_not_counted_toward_capacity() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![discussion(
            "d1",
            "g1",
            Some(1),
            NOW + HOUR,
            &["me", "p1", "p2"],
        )];

        let summary = calculate_group_availability(&groups, &discussions, Some(5), "me", NOW);

        assert_eq!(
            summary.discussions_available["1"][0].spots_left_if_known,
            Some(3)
        );
    }

    #[test]
    fn identical_inputs_yield_identical_outputs() {
        let groups = vec![
            group("g1", Some("Group A"), &["p1", "p2"]),
            group("g2", None, &["p3"]),
        ];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW - HOUR, &["p1", "p2"]),
            discussion("d2", "g1", Some(2), NOW + HOUR, &["p1"]),
            discussion("d3", "g2", Some(1), NOW + HOUR, &["p3"]),
        ];

        let first = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);
        let second = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn group_with_an_upcoming_discussion_is_still_open() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW - HOUR, &["a", "b", "c"]),
            discussion("d2", "g1", Some(2), NOW + HOUR, &["a", "b"]),
        ];

        let summary = calculate_group_availability(&groups, &discussions, Some(4), "p1", NOW);

        let g = &summary.groups_available[0];
        assert!(!g.is_too_late_to_switch_to);
        // The past discussion (1 spot) does not drag the minimum down.
        assert_eq!(g.spots_left_if_known, Some(2));
    }

    #[test]
    fn group_with_only_past_discussions_is_too_late() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW - 2 * HOUR, &[]),
            discussion("d2", "g1", Some(2), NOW - HOUR, &[]),
        ];

        let summary = calculate_group_availability(&groups, &discussions, Some(4), "p1", NOW);

        let g = &summary.groups_available[0];
        assert!(g.is_too_late_to_switch_to);
        // Nothing left to join is not the same as full.
        assert_eq!(g.spots_left_if_known, None);
    }

    #[test]
    fn unknown_capacity_yields_no_spot_counts() {
        let groups = vec![group("g1", Some("Group A"), &[])];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW + HOUR, &["a", "b", "c"]),
            discussion("d2", "g1", Some(2), NOW + HOUR, &[]),
        ];

        let summary = calculate_group_availability(&groups, &discussions, None, "p1", NOW);

        assert_eq!(summary.groups_available[0].spots_left_if_known, None);
        for entries in summary.discussions_available.values() {
            for entry in entries {
                assert_eq!(entry.spots_left_if_known, None);
            }
        }
    }

    #[test]
    fn discussions_are_bucketed_by_unit_number() {
        let groups = vec![
            group("g1", Some("Group A"), &[]),
            group("g2", Some("Group B"), &[]),
        ];
        let discussions = vec![
            discussion("d1", "g1", Some(1), NOW + HOUR, &[]),
            discussion("d2", "g2", Some(1), NOW + 2 * HOUR, &[]),
            discussion("d3", "g1", Some(2), NOW + HOUR, &[]),
        ];

        let summary = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);

        assert_eq!(summary.discussions_available["1"].len(), 2);
        assert_eq!(summary.discussions_available["2"].len(), 1);
        assert_eq!(summary.discussions_available.keys().count(), 2);
    }

    #[test]
    fn nameless_group_gets_placeholder_display_name() {
        let groups = vec![group("g1", None, &[])];
        let discussions = vec![discussion("d1", "g1", Some(1), NOW + HOUR, &[])];

        let summary = calculate_group_availability(&groups, &discussions, Some(8), "p1", NOW);

        assert_eq!(
            summary.discussions_available["1"][0].group_name,
            UNKNOWN_GROUP_NAME
        );
    }

    #[test]
    fn group_membership_comes_from_the_roster_not_attendance() {
        // A participant can be on the group roster without being expected at
        // a given occurrence (or vice versa); both views are reported as-is.
        let groups = vec![group("g1", Some("Group A"), &["me"])];
        let discussions = vec![discussion("d1", "g1", Some(1), NOW + HOUR, &["p1"])];

        let summary = calculate_group_availability(&groups, &discussions, Some(8), "me", NOW);

        assert!(summary.groups_available[0].user_is_participant);
        assert!(!summary.discussions_available["1"][0].user_is_participant);
    }
}
