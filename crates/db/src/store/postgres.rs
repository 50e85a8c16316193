//! PostgreSQL-backed stores.

use async_trait::async_trait;
use studio_core::approval::ApprovalStatus;
use studio_core::design::Design;
use studio_core::portal::PortalToken;
use studio_core::types::Timestamp;

use crate::error::StoreError;
use crate::models::design::DesignRow;
use crate::repositories::{DesignRepo, PortalTokenRepo};
use crate::store::{design_not_found, merge_saved_content, DesignStore, PortalTokenStore};
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

fn decode_all(rows: Vec<DesignRow>) -> Result<Vec<Design>, StoreError> {
    rows.into_iter()
        .map(|row| row.into_design().map_err(StoreError::from))
        .collect()
}

/// [`DesignStore`] persisting each design as a JSONB document.
#[derive(Clone)]
pub struct PgDesignStore {
    pool: DbPool,
}

impl PgDesignStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DesignStore for PgDesignStore {
    async fn insert(&self, design: &Design) -> Result<(), StoreError> {
        let document = serde_json::to_value(design)?;
        DesignRepo::create(&self.pool, design, &document)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("Design '{}' already exists", design.id))
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn get(&self, id: &str) -> Result<Option<Design>, StoreError> {
        match DesignRepo::find_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(row.into_design()?)),
            None => Ok(None),
        }
    }

    async fn list_for_brand(&self, brand_id: &str) -> Result<Vec<Design>, StoreError> {
        decode_all(DesignRepo::list_for_brand(&self.pool, brand_id).await?)
    }

    async fn list_for_brand_with_status(
        &self,
        brand_id: &str,
        status: ApprovalStatus,
    ) -> Result<Vec<Design>, StoreError> {
        decode_all(DesignRepo::list_for_brand_with_status(&self.pool, brand_id, status).await?)
    }

    async fn update(&self, design: &Design) -> Result<(), StoreError> {
        let document = serde_json::to_value(design)?;
        if DesignRepo::update(&self.pool, design, &document).await? {
            Ok(())
        } else {
            Err(design_not_found(&design.id))
        }
    }

    async fn save_content(&self, design: &Design) -> Result<Design, StoreError> {
        let mut tx = self.pool.begin().await?;
        let stored = DesignRepo::find_by_id_for_update(&mut *tx, &design.id)
            .await?
            .ok_or_else(|| design_not_found(&design.id))?
            .into_design()?;

        let merged = merge_saved_content(design, &stored);
        let document = serde_json::to_value(&merged)?;
        DesignRepo::update(&mut *tx, &merged, &document).await?;
        tx.commit().await?;
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(DesignRepo::delete(&self.pool, id).await?)
    }
}

/// [`PortalTokenStore`] backed by the `portal_tokens` table.
#[derive(Clone)]
pub struct PgPortalTokenStore {
    pool: DbPool,
}

impl PgPortalTokenStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortalTokenStore for PgPortalTokenStore {
    async fn insert(&self, token: &PortalToken) -> Result<(), StoreError> {
        PortalTokenRepo::create(&self.pool, token)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict("Portal token already exists".to_string())
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<PortalToken>, StoreError> {
        let row = PortalTokenRepo::find_active(&self.pool, token_hash, now).await?;
        Ok(row.map(PortalToken::from))
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(PortalTokenRepo::revoke(&self.pool, token_hash).await?)
    }
}
