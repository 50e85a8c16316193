use std::sync::Arc;

use studio_db::{DbPool, DesignStore, PortalTokenStore};
use studio_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Design persistence (PostgreSQL or in-memory).
    pub designs: Arc<dyn DesignStore>,
    /// Client-portal grants, keyed by token digest.
    pub portal_tokens: Arc<dyn PortalTokenStore>,
    /// Event bus for design lifecycle and review events.
    pub event_bus: Arc<EventBus>,
    /// Database pool, present only when the PostgreSQL stores are in use.
    pub pool: Option<DbPool>,
}
