//! Group-switching API endpoints.
//!
//! The availability query feeds the course hub's "switch group" modal; the
//! submission endpoint re-checks availability server-side so stale modals
//! cannot request seats that are gone.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;

use super::{error, success, ApiResult};
use crate::auth;
use crate::availability::calculate_group_availability;
use crate::errors::AppError;
use crate::models::{AvailabilitySummary, CreateSwitchRequest, SwitchRequest};
use crate::AppState;

/// GET /api/rounds/:round_id/availability - Compute switching availability
/// for the requesting participant across a round's groups.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(round_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<AvailabilitySummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let participant_id = match auth::participant_from_headers(&headers) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    let groups = match state.repo.list_groups(Some(&round_id)).await {
        Ok(groups) => groups,
        Err(e) => return error(e, revision_id),
    };
    let discussions = match state.repo.list_discussions(Some(&round_id), None).await {
        Ok(discussions) => discussions,
        Err(e) => return error(e, revision_id),
    };

    let summary = calculate_group_availability(
        &groups,
        &discussions,
        state.config.max_group_size,
        &participant_id,
        Utc::now().timestamp(),
    );

    success(summary, revision_id)
}

/// POST /api/rounds/:round_id/switch-requests - Submit a switch request.
pub async fn create_switch_request(
    State(state): State<AppState>,
    Path(round_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<CreateSwitchRequest>,
) -> ApiResult<SwitchRequest> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let participant_id = match auth::participant_from_headers(&headers) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    if request.to_group_id.trim().is_empty() {
        return error(
            AppError::Validation("toGroupId is required".to_string()),
            revision_id,
        );
    }

    let groups = match state.repo.list_groups(Some(&round_id)).await {
        Ok(groups) => groups,
        Err(e) => return error(e, revision_id),
    };
    let discussions = match state.repo.list_discussions(Some(&round_id), None).await {
        Ok(discussions) => discussions,
        Err(e) => return error(e, revision_id),
    };

    let summary = calculate_group_availability(
        &groups,
        &discussions,
        state.config.max_group_size,
        &participant_id,
        Utc::now().timestamp(),
    );

    let Some(target) = summary
        .groups_available
        .iter()
        .find(|g| g.group.id == request.to_group_id)
    else {
        return error(
            AppError::Validation(format!(
                "Group {} is not available for switching in round {}",
                request.to_group_id, round_id
            )),
            revision_id,
        );
    };

    if target.is_too_late_to_switch_to {
        return error(
            AppError::Validation(format!(
                "All discussions of group {} have already started",
                request.to_group_id
            )),
            revision_id,
        );
    }

    if target.spots_left_if_known == Some(0) {
        return error(
            AppError::Validation(format!("Group {} is full", request.to_group_id)),
            revision_id,
        );
    }

    // A picked occurrence must belong to the target group.
    if let Some(to_discussion_id) = &request.to_discussion_id {
        let belongs = discussions
            .iter()
            .any(|d| &d.id == to_discussion_id && d.group_id == request.to_group_id);
        if !belongs {
            return error(
                AppError::Validation(format!(
                    "Discussion {} does not belong to group {}",
                    to_discussion_id, request.to_group_id
                )),
                revision_id,
            );
        }
    }

    match state
        .repo
        .create_switch_request(
            &round_id,
            &participant_id,
            request.from_group_id.as_deref(),
            &request.to_group_id,
            request.to_discussion_id.as_deref(),
            request.note.as_deref(),
        )
        .await
    {
        Ok(switch_request) => {
            tracing::info!(
                participant_id = %participant_id,
                to_group_id = %switch_request.to_group_id,
                "Recorded switch request"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(switch_request, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/rounds/:round_id/switch-requests - List a round's switch requests.
pub async fn list_switch_requests(
    State(state): State<AppState>,
    Path(round_id): Path<String>,
) -> ApiResult<Vec<SwitchRequest>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_switch_requests(&round_id).await {
        Ok(requests) => success(requests, revision_id),
        Err(e) => error(e, revision_id),
    }
}
