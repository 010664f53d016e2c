//! Discussion group API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateGroupRequest, DiscussionGroup, UpdateGroupRequest};
use crate::AppState;

/// Query parameters for listing groups.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsQuery {
    #[serde(default)]
    pub round_id: Option<String>,
}

/// GET /api/groups - List groups, optionally scoped to a round.
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<ListGroupsQuery>,
) -> ApiResult<Vec<DiscussionGroup>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_groups(query.round_id.as_deref()).await {
        Ok(groups) => success(groups, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/groups/:id - Get a single group.
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DiscussionGroup> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_group(&id).await {
        Ok(Some(group)) => success(group, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Group {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/groups - Create a new group.
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> ApiResult<DiscussionGroup> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Validate required fields
    if request.round_id.trim().is_empty() {
        return error(
            AppError::Validation("Round ID is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_group(&request).await {
        Ok(group) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/groups/:id - Update a group.
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> ApiResult<DiscussionGroup> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.update_group(&id, &request).await {
        Ok(group) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(group, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/groups/:id - Delete a group and its discussions.
pub async fn delete_group(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_group(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
