//! Handlers for the design review workflow.
//!
//! Every endpoint funnels into [`apply_transition`], which runs the guarded
//! transition function, persists the result, and publishes the review event.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use studio_core::approval::{apply_approval_action, ApprovalAction};
use studio_core::design::Design;
use studio_core::scheduling::SchedulePayload;
use studio_events::StudioEvent;

use crate::error::AppResult;
use crate::handlers::design::load_design;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestApprovalRequest {
    pub requester_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub reviewer_id: String,
    pub notes: Option<String>,
}

/// A missing `reason` is reported by the transition's validation, not by
/// JSON extraction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub reviewer_id: String,
    #[serde(default)]
    pub reason: String,
}

/// Apply `action` to `design`, persist, and publish the matching event.
pub async fn apply_transition(
    state: &AppState,
    design: &Design,
    action: ApprovalAction,
) -> AppResult<Design> {
    let kind = action.kind();
    let actor = action.actor().map(str::to_string);
    let from = design.approval().status();

    let next = apply_approval_action(design, action, chrono::Utc::now())?;
    state.designs.update(&next).await?;

    tracing::info!(
        design_id = %next.id,
        brand_id = %next.brand_id,
        actor = ?actor,
        action = ?kind,
        from = %from,
        to = %next.approval().status(),
        "Design review transition"
    );
    state
        .event_bus
        .publish(StudioEvent::approval(&next, kind, actor.as_deref()));

    Ok(next)
}

/// POST /api/v1/designs/{design_id}/approval/request
pub async fn request_approval(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
    Json(input): Json<RequestApprovalRequest>,
) -> AppResult<impl IntoResponse> {
    let design = load_design(&state, &design_id).await?;
    let action = ApprovalAction::RequestApproval {
        requester_id: input.requester_id,
    };
    let updated = apply_transition(&state, &design, action).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/designs/{design_id}/approval/approve
pub async fn approve_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    let design = load_design(&state, &design_id).await?;
    let action = ApprovalAction::Approve {
        reviewer_id: input.reviewer_id,
        notes: input.notes,
    };
    let updated = apply_transition(&state, &design, action).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/designs/{design_id}/approval/reject
pub async fn reject_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    let design = load_design(&state, &design_id).await?;
    let action = ApprovalAction::Reject {
        reviewer_id: input.reviewer_id,
        reason: input.reason,
    };
    let updated = apply_transition(&state, &design, action).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/designs/{design_id}/schedule
///
/// Only approved designs can be scheduled.
pub async fn schedule_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
    Json(input): Json<SchedulePayload>,
) -> AppResult<impl IntoResponse> {
    let design = load_design(&state, &design_id).await?;
    let updated = apply_transition(&state, &design, ApprovalAction::Schedule(input)).await?;
    Ok(Json(DataResponse { data: updated }))
}
