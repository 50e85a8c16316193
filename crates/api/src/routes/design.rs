//! Route definitions for designs and their review workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{approval, design};
use crate::state::AppState;

/// Routes mounted at `/designs`.
///
/// ```text
/// GET    /                                  list_designs
/// POST   /                                  create_design
/// GET    /{design_id}                       get_design
/// PUT    /{design_id}                       save_design
/// DELETE /{design_id}                       delete_design
/// POST   /{design_id}/approval/request      request_approval
/// POST   /{design_id}/approval/approve      approve_design
/// POST   /{design_id}/approval/reject       reject_design
/// POST   /{design_id}/schedule              schedule_design
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(design::list_designs).post(design::create_design))
        .route(
            "/{design_id}",
            get(design::get_design)
                .put(design::save_design)
                .delete(design::delete_design),
        )
        .route(
            "/{design_id}/approval/request",
            post(approval::request_approval),
        )
        .route(
            "/{design_id}/approval/approve",
            post(approval::approve_design),
        )
        .route("/{design_id}/approval/reject", post(approval::reject_design))
        .route("/{design_id}/schedule", post(approval::schedule_design))
}
