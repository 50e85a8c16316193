pub mod design;
pub mod health;
pub mod portal;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /designs                                      create, list (?brandId=&status=)
/// /designs/{design_id}                          get, save (PUT), delete
/// /designs/{design_id}/approval/request         request approval (POST)
/// /designs/{design_id}/approval/approve         approve (POST)
/// /designs/{design_id}/approval/reject          reject (POST)
/// /designs/{design_id}/schedule                 schedule (POST)
///
/// /portal/tokens                                issue client-portal token (POST)
/// /portal/{token}                               revoke (DELETE)
/// /portal/{token}/designs                       designs awaiting approval (GET)
/// /portal/{token}/designs/{design_id}/approve   client approves (POST)
/// /portal/{token}/designs/{design_id}/reject    client rejects (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/designs", design::router())
        .nest("/portal", portal::router())
}
