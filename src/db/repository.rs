//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateDiscussionRequest, CreateGroupRequest, DiscussionGroup, GroupDiscussion, RevisionInfo,
    SwitchRequest, UpdateGroupRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== GROUP OPERATIONS ====================

    /// List groups, optionally scoped to a round.
    pub async fn list_groups(&self, round_id: Option<&str>) -> Result<Vec<DiscussionGroup>, AppError> {
        let rows = match round_id {
            Some(round_id) => {
                sqlx::query(
                    "SELECT id, round_id, group_name, participants, updated_at, version FROM discussion_groups WHERE round_id = ? ORDER BY group_name"
                )
                .bind(round_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, round_id, group_name, participants, updated_at, version FROM discussion_groups ORDER BY group_name"
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(group_from_row).collect())
    }

    /// Get a group by ID.
    pub async fn get_group(&self, id: &str) -> Result<Option<DiscussionGroup>, AppError> {
        let row = sqlx::query(
            "SELECT id, round_id, group_name, participants, updated_at, version FROM discussion_groups WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(group_from_row))
    }

    /// Create a new group.
    pub async fn create_group(
        &self,
        request: &CreateGroupRequest,
    ) -> Result<DiscussionGroup, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let participants_json =
            serde_json::to_string(&request.participant_ids).unwrap_or_default();

        sqlx::query(
            "INSERT INTO discussion_groups (id, round_id, group_name, participants, updated_at, version) VALUES (?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.round_id)
        .bind(&request.group_name)
        .bind(&participants_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(DiscussionGroup {
            id,
            round_id: request.round_id.clone(),
            group_name: request.group_name.clone(),
            participant_ids: request.participant_ids.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update a group with optimistic concurrency control.
    pub async fn update_group(
        &self,
        id: &str,
        request: &UpdateGroupRequest,
    ) -> Result<DiscussionGroup, AppError> {
        let existing = self
            .get_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", id)))?;

        // Check version for optimistic concurrency
        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let group_name = request.group_name.clone().or(existing.group_name.clone());
        let participant_ids = request
            .participant_ids
            .clone()
            .unwrap_or(existing.participant_ids.clone());
        let participants_json = serde_json::to_string(&participant_ids).unwrap_or_default();

        // Use conditional UPDATE with version check to prevent race conditions
        let result = sqlx::query(
            "UPDATE discussion_groups SET group_name = ?, participants = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&group_name)
        .bind(&participants_json)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Race condition - version changed between read and write
            let current = self.get_group(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|g| g.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(DiscussionGroup {
            id: id.to_string(),
            round_id: existing.round_id,
            group_name,
            participant_ids,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a group together with its scheduled discussions.
    pub async fn delete_group(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM discussion_groups WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Group {} not found", id)));
        }

        sqlx::query("DELETE FROM discussions WHERE group_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==================== DISCUSSION OPERATIONS ====================

    /// List discussions, optionally scoped to a round or a group.
    pub async fn list_discussions(
        &self,
        round_id: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<Vec<GroupDiscussion>, AppError> {
        let rows = match (round_id, group_id) {
            (_, Some(group_id)) => {
                sqlx::query(
                    "SELECT id, group_id, unit_number, starts_at, ends_at, attendees, updated_at, version FROM discussions WHERE group_id = ? ORDER BY starts_at"
                )
                .bind(group_id)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(round_id), None) => {
                sqlx::query(
                    r#"SELECT d.id, d.group_id, d.unit_number, d.starts_at, d.ends_at, d.attendees, d.updated_at, d.version
                       FROM discussions d
                       JOIN discussion_groups g ON d.group_id = g.id
                       WHERE g.round_id = ?
                       ORDER BY d.starts_at"#,
                )
                .bind(round_id)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query(
                    "SELECT id, group_id, unit_number, starts_at, ends_at, attendees, updated_at, version FROM discussions ORDER BY starts_at"
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(discussion_from_row).collect())
    }

    /// Get a discussion by ID.
    pub async fn get_discussion(&self, id: &str) -> Result<Option<GroupDiscussion>, AppError> {
        let row = sqlx::query(
            "SELECT id, group_id, unit_number, starts_at, ends_at, attendees, updated_at, version FROM discussions WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(discussion_from_row))
    }

    /// Create a new discussion occurrence.
    pub async fn create_discussion(
        &self,
        request: &CreateDiscussionRequest,
    ) -> Result<GroupDiscussion, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let attendees_json = serde_json::to_string(&request.attendee_ids).unwrap_or_default();

        sqlx::query(
            "INSERT INTO discussions (id, group_id, unit_number, starts_at, ends_at, attendees, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.group_id)
        .bind(request.unit_number)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(&attendees_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(GroupDiscussion {
            id,
            group_id: request.group_id.clone(),
            unit_number: request.unit_number,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            attendee_ids: request.attendee_ids.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Delete a discussion.
    pub async fn delete_discussion(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM discussions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Discussion {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== SWITCH REQUEST OPERATIONS ====================

    /// Record a switch request.
    pub async fn create_switch_request(
        &self,
        round_id: &str,
        participant_id: &str,
        from_group_id: Option<&str>,
        to_group_id: &str,
        to_discussion_id: Option<&str>,
        note: Option<&str>,
    ) -> Result<SwitchRequest, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO switch_requests (id, round_id, participant_id, from_group_id, to_group_id, to_discussion_id, note, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(round_id)
        .bind(participant_id)
        .bind(from_group_id)
        .bind(to_group_id)
        .bind(to_discussion_id)
        .bind(note)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(SwitchRequest {
            id,
            round_id: round_id.to_string(),
            participant_id: participant_id.to_string(),
            from_group_id: from_group_id.map(|s| s.to_string()),
            to_group_id: to_group_id.to_string(),
            to_discussion_id: to_discussion_id.map(|s| s.to_string()),
            note: note.map(|s| s.to_string()),
            created_at: now,
        })
    }

    /// List switch requests for a round, newest first.
    pub async fn list_switch_requests(&self, round_id: &str) -> Result<Vec<SwitchRequest>, AppError> {
        let rows = sqlx::query(
            "SELECT id, round_id, participant_id, from_group_id, to_group_id, to_discussion_id, note, created_at FROM switch_requests WHERE round_id = ? ORDER BY created_at DESC"
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(switch_request_from_row).collect())
    }
}

// Helper functions for row conversion

fn group_from_row(row: &sqlx::sqlite::SqliteRow) -> DiscussionGroup {
    let participants_str: Option<String> = row.get("participants");
    DiscussionGroup {
        id: row.get("id"),
        round_id: row.get("round_id"),
        group_name: row.get("group_name"),
        participant_ids: participants_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn discussion_from_row(row: &sqlx::sqlite::SqliteRow) -> GroupDiscussion {
    let attendees_str: Option<String> = row.get("attendees");
    GroupDiscussion {
        id: row.get("id"),
        group_id: row.get("group_id"),
        unit_number: row.get("unit_number"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
        attendee_ids: attendees_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn switch_request_from_row(row: &sqlx::sqlite::SqliteRow) -> SwitchRequest {
    SwitchRequest {
        id: row.get("id"),
        round_id: row.get("round_id"),
        participant_id: row.get("participant_id"),
        from_group_id: row.get("from_group_id"),
        to_group_id: row.get("to_group_id"),
        to_discussion_id: row.get("to_discussion_id"),
        note: row.get("note"),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
