//! Store traits the API depends on.
//!
//! Stores are constructed explicitly at startup and injected into the
//! application state as `Arc<dyn …>`, so tests can substitute the in-memory
//! implementations without a database.

use async_trait::async_trait;
use studio_core::approval::ApprovalStatus;
use studio_core::design::Design;
use studio_core::portal::PortalToken;
use studio_core::types::Timestamp;

use crate::error::StoreError;

pub mod memory;
pub mod postgres;

/// Persistence for full design documents. Last write wins.
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Insert a new design. Fails with [`StoreError::Conflict`] if the id exists.
    async fn insert(&self, design: &Design) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Design>, StoreError>;

    /// A brand's designs, most recently updated first.
    async fn list_for_brand(&self, brand_id: &str) -> Result<Vec<Design>, StoreError>;

    /// A brand's designs in one review state, oldest update first.
    async fn list_for_brand_with_status(
        &self,
        brand_id: &str,
        status: ApprovalStatus,
    ) -> Result<Vec<Design>, StoreError>;

    /// Overwrite an existing design. Fails with [`StoreError::NotFound`] if absent.
    async fn update(&self, design: &Design) -> Result<(), StoreError>;

    /// Write an editor save without touching review state.
    ///
    /// Approval, schedule and `created_at` are taken from the stored row while
    /// it is locked, so a transition committed after the caller's read is kept.
    /// Returns the design as written.
    async fn save_content(&self, design: &Design) -> Result<Design, StoreError>;

    /// Returns `true` if a design was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Persistence for client-portal grants, keyed by token digest.
#[async_trait]
pub trait PortalTokenStore: Send + Sync {
    async fn insert(&self, token: &PortalToken) -> Result<(), StoreError>;

    /// The grant for `token_hash` if it is neither revoked nor expired at `now`.
    async fn find_active(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<PortalToken>, StoreError>;

    /// Returns `true` if an active grant was revoked.
    async fn revoke(&self, token_hash: &str) -> Result<bool, StoreError>;
}

/// `incoming` with the stored design's review state and creation time.
pub(crate) fn merge_saved_content(incoming: &Design, stored: &Design) -> Design {
    let mut merged = incoming.clone().with_workflow_from(stored);
    merged.created_at = stored.created_at;
    merged
}

pub(crate) fn design_not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: "Design",
        id: id.to_string(),
    }
}
