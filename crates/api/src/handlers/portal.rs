//! Handlers for the client portal.
//!
//! A portal token grants review access to one brand's designs. The token in
//! the path is hashed and looked up; unknown, expired, and revoked tokens
//! all answer 401 alike.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use studio_core::approval::{ApprovalAction, ApprovalStatus};
use studio_core::design::Design;
use studio_core::error::CoreError;
use studio_core::portal::{generate_portal_token, hash_portal_token, PortalToken};
use studio_core::types::{EntityId, Timestamp};

use crate::error::{AppError, AppResult};
use crate::handlers::approval::apply_transition;
use crate::handlers::design::load_design;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssuePortalTokenRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand_id: String,
    #[validate(email)]
    pub client_email: String,
    /// Defaults to the server's `PORTAL_TOKEN_TTL_HOURS`.
    pub ttl_hours: Option<i64>,
}

/// The only response that ever contains the plaintext token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedPortalToken {
    pub token: String,
    pub brand_id: EntityId,
    pub client_email: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientApproveRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRejectRequest {
    #[serde(default)]
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn authorize(state: &AppState, token: &str) -> AppResult<PortalToken> {
    state
        .portal_tokens
        .find_active(&hash_portal_token(token), Utc::now())
        .await?
        .ok_or_else(invalid_token)
}

fn invalid_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired portal token".to_string(),
    ))
}

/// Load a design visible to `grant`. Designs of other brands answer 404.
async fn load_brand_design(
    state: &AppState,
    grant: &PortalToken,
    design_id: &str,
) -> AppResult<Design> {
    let design = load_design(state, design_id).await?;
    if design.brand_id != grant.brand_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id.to_string(),
        }));
    }
    Ok(design)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/portal/tokens
///
/// Returns the plaintext token once; only its digest is stored.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(input): Json<IssuePortalTokenRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let ttl_hours = input
        .ttl_hours
        .unwrap_or(state.config.portal_token_ttl_hours);
    let generated = generate_portal_token();
    let grant = PortalToken::issue(
        generated.hash,
        &input.brand_id,
        &input.client_email,
        ttl_hours,
        Utc::now(),
    )?;

    state.portal_tokens.insert(&grant).await?;

    tracing::info!(
        brand_id = %grant.brand_id,
        client_email = %grant.client_email,
        expires_at = %grant.expires_at,
        "Portal token issued"
    );

    let issued = IssuedPortalToken {
        token: generated.plaintext,
        brand_id: grant.brand_id,
        client_email: grant.client_email,
        expires_at: grant.expires_at,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: issued })))
}

/// DELETE /api/v1/portal/{token}
pub async fn revoke_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<StatusCode> {
    let revoked = state
        .portal_tokens
        .revoke(&hash_portal_token(&token))
        .await?;
    if !revoked {
        return Err(invalid_token());
    }

    tracing::info!("Portal token revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/portal/{token}/designs
///
/// The token's brand's designs awaiting approval, oldest request first.
pub async fn list_pending_designs(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let grant = authorize(&state, &token).await?;
    let designs = state
        .designs
        .list_for_brand_with_status(&grant.brand_id, ApprovalStatus::PendingApproval)
        .await?;
    Ok(Json(DataResponse { data: designs }))
}

/// POST /api/v1/portal/{token}/designs/{design_id}/approve
///
/// The reviewer is recorded as the token's client email.
pub async fn client_approve(
    State(state): State<AppState>,
    Path((token, design_id)): Path<(String, String)>,
    body: Option<Json<ClientApproveRequest>>,
) -> AppResult<impl IntoResponse> {
    let grant = authorize(&state, &token).await?;
    let design = load_brand_design(&state, &grant, &design_id).await?;
    let notes = body.and_then(|Json(input)| input.notes);

    let action = ApprovalAction::Approve {
        reviewer_id: grant.client_email,
        notes,
    };
    let updated = apply_transition(&state, &design, action).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/portal/{token}/designs/{design_id}/reject
pub async fn client_reject(
    State(state): State<AppState>,
    Path((token, design_id)): Path<(String, String)>,
    Json(input): Json<ClientRejectRequest>,
) -> AppResult<impl IntoResponse> {
    let grant = authorize(&state, &token).await?;
    let design = load_brand_design(&state, &grant, &design_id).await?;

    let action = ApprovalAction::Reject {
        reviewer_id: grant.client_email,
        reason: input.reason,
    };
    let updated = apply_transition(&state, &design, action).await?;
    Ok(Json(DataResponse { data: updated }))
}
