//! Handlers for creating, listing, saving, and deleting designs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use studio_core::approval::ApprovalStatus;
use studio_core::design::{create_custom_design, create_initial_design, Design, SaveAction};
use studio_core::error::CoreError;
use studio_core::format::DesignFormat;
use studio_core::types::EntityId;
use studio_events::{event_types, StudioEvent};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /designs`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignRequest {
    /// Preset key, e.g. `social_square`.
    pub format: String,
    #[validate(length(min = 1, max = 100))]
    pub brand_id: String,
    #[validate(length(min = 1, max = 100))]
    pub campaign_id: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// Only accepted for the `custom` format.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDesignsQuery {
    pub brand_id: String,
    pub status: Option<ApprovalStatus>,
}

/// Body of `PUT /designs/{design_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDesignRequest {
    pub design: Design,
    /// Defaults to `save_draft`.
    pub action: Option<SaveAction>,
    /// Required when `action` is `save_to_library`.
    pub library_asset_id: Option<EntityId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a design or fail with 404.
pub async fn load_design(state: &AppState, design_id: &str) -> AppResult<Design> {
    state.designs.get(design_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id.to_string(),
        })
    })
}

fn blank_design(input: &CreateDesignRequest) -> AppResult<Design> {
    let format: DesignFormat = input.format.trim().parse()?;
    let campaign_id = input.campaign_id.as_deref();

    let design = match (format, input.width, input.height) {
        (DesignFormat::Custom, None, None) => {
            create_initial_design(format, &input.brand_id, campaign_id)?
        }
        (DesignFormat::Custom, width, height) => {
            let (default_width, default_height) = format.dimensions();
            create_custom_design(
                width.unwrap_or(default_width),
                height.unwrap_or(default_height),
                &input.brand_id,
                campaign_id,
            )?
        }
        (_, None, None) => create_initial_design(format, &input.brand_id, campaign_id)?,
        (_, _, _) => {
            return Err(AppError::BadRequest(format!(
                "width and height can only be set for the custom format, not {format}"
            )))
        }
    };
    Ok(design)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/designs
///
/// Create a blank design from a format preset.
pub async fn create_design(
    State(state): State<AppState>,
    Json(input): Json<CreateDesignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let mut design = blank_design(&input)?;
    design.name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    state.designs.insert(&design).await?;

    tracing::info!(
        design_id = %design.id,
        brand_id = %design.brand_id,
        format = %design.format,
        "Design created"
    );
    state
        .event_bus
        .publish(StudioEvent::new(event_types::DESIGN_CREATED).with_design(&design));

    Ok((StatusCode::CREATED, Json(DataResponse { data: design })))
}

/// GET /api/v1/designs?brandId=&status=
///
/// A brand's designs, most recently updated first. With `status`, only
/// designs in that review state, oldest update first.
pub async fn list_designs(
    State(state): State<AppState>,
    Query(query): Query<ListDesignsQuery>,
) -> AppResult<impl IntoResponse> {
    if query.brand_id.trim().is_empty() {
        return Err(AppError::BadRequest("brandId must not be empty".to_string()));
    }

    let designs = match query.status {
        Some(status) => {
            state
                .designs
                .list_for_brand_with_status(&query.brand_id, status)
                .await?
        }
        None => state.designs.list_for_brand(&query.brand_id).await?,
    };

    Ok(Json(DataResponse { data: designs }))
}

/// GET /api/v1/designs/{design_id}
pub async fn get_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let design = load_design(&state, &design_id).await?;
    Ok(Json(DataResponse { data: design }))
}

/// PUT /api/v1/designs/{design_id}
///
/// Save the editor's full design document. Review and scheduling fields are
/// always taken from the stored design; those only change through the
/// approval endpoints.
pub async fn save_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
    Json(input): Json<SaveDesignRequest>,
) -> AppResult<impl IntoResponse> {
    if input.design.id != design_id {
        return Err(AppError::BadRequest(format!(
            "Design id '{}' does not match path id '{design_id}'",
            input.design.id
        )));
    }

    let action = input.action.unwrap_or(SaveAction::SaveDraft);
    if matches!(action, SaveAction::SendForApproval | SaveAction::Schedule) {
        return Err(AppError::BadRequest(format!(
            "Use the approval endpoints to {}",
            match action {
                SaveAction::Schedule => "schedule a design",
                _ => "send a design for approval",
            }
        )));
    }

    let stored = load_design(&state, &design_id).await?;
    if input.design.brand_id != stored.brand_id {
        return Err(AppError::BadRequest(
            "A design cannot be moved to another brand".to_string(),
        ));
    }

    let mut design = input.design.with_workflow_from(&stored);
    design.record_save(action, input.library_asset_id, chrono::Utc::now())?;
    design.validate()?;

    let design = state.designs.save_content(&design).await?;

    tracing::info!(
        design_id = %design.id,
        brand_id = %design.brand_id,
        action = ?action,
        items = design.items.len(),
        "Design saved"
    );
    state.event_bus.publish(
        StudioEvent::new(event_types::DESIGN_SAVED)
            .with_design(&design)
            .with_payload(serde_json::json!({ "action": action })),
    );

    Ok(Json(DataResponse { data: design }))
}

/// DELETE /api/v1/designs/{design_id}
pub async fn delete_design(
    State(state): State<AppState>,
    Path(design_id): Path<String>,
) -> AppResult<StatusCode> {
    let design = load_design(&state, &design_id).await?;
    if !state.designs.delete(&design_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id: design_id,
        }));
    }

    tracing::info!(design_id = %design.id, brand_id = %design.brand_id, "Design deleted");
    state
        .event_bus
        .publish(StudioEvent::new(event_types::DESIGN_DELETED).with_design(&design));

    Ok(StatusCode::NO_CONTENT)
}
