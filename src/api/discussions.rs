//! Discussion occurrence API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateDiscussionRequest, GroupDiscussion};
use crate::AppState;

/// Query parameters for listing discussions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDiscussionsQuery {
    #[serde(default)]
    pub round_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// GET /api/discussions - List discussions, optionally scoped to a round or group.
pub async fn list_discussions(
    State(state): State<AppState>,
    Query(query): Query<ListDiscussionsQuery>,
) -> ApiResult<Vec<GroupDiscussion>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .list_discussions(query.round_id.as_deref(), query.group_id.as_deref())
        .await
    {
        Ok(discussions) => success(discussions, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/discussions/:id - Get a single discussion.
pub async fn get_discussion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GroupDiscussion> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_discussion(&id).await {
        Ok(Some(discussion)) => success(discussion, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Discussion {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/discussions - Create a new discussion occurrence.
pub async fn create_discussion(
    State(state): State<AppState>,
    Json(request): Json<CreateDiscussionRequest>,
) -> ApiResult<GroupDiscussion> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.ends_at <= request.starts_at {
        return error(
            AppError::Validation("endsAt must be after startsAt".to_string()),
            revision_id,
        );
    }

    // The owning group must exist; unit-less discussions are allowed but
    // never surface in switching availability.
    match state.repo.get_group(&request.group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error(
                AppError::Validation(format!("Group {} does not exist", request.group_id)),
                revision_id,
            );
        }
        Err(e) => return error(e, revision_id),
    }

    match state.repo.create_discussion(&request).await {
        Ok(discussion) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(discussion, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/discussions/:id - Delete a discussion.
pub async fn delete_discussion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_discussion(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
