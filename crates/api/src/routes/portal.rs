//! Route definitions for the client portal.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// Routes mounted at `/portal`.
///
/// ```text
/// POST   /tokens                                  issue_token
/// DELETE /{token}                                 revoke_token
/// GET    /{token}/designs                         list_pending_designs
/// POST   /{token}/designs/{design_id}/approve     client_approve
/// POST   /{token}/designs/{design_id}/reject      client_reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(portal::issue_token))
        .route("/{token}", delete(portal::revoke_token))
        .route("/{token}/designs", get(portal::list_pending_designs))
        .route(
            "/{token}/designs/{design_id}/approve",
            post(portal::client_approve),
        )
        .route(
            "/{token}/designs/{design_id}/reject",
            post(portal::client_reject),
        )
}
