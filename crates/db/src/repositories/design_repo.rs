//! Repository for the `designs` table.

use sqlx::{PgExecutor, PgPool};
use studio_core::approval::ApprovalStatus;
use studio_core::design::Design;

use crate::models::design::DesignRow;

/// Column list for designs queries.
const COLUMNS: &str =
    "id, brand_id, campaign_id, approval_status, document, created_at, updated_at";

/// Provides CRUD operations for designs.
pub struct DesignRepo;

impl DesignRepo {
    /// Insert a new design. Fails with a unique violation if the id exists.
    pub async fn create(
        pool: &PgPool,
        design: &Design,
        document: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO designs
                (id, brand_id, campaign_id, approval_status, document, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&design.id)
        .bind(&design.brand_id)
        .bind(&design.campaign_id)
        .bind(design.approval().status().as_str())
        .bind(document)
        .bind(design.created_at)
        .bind(design.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a design by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<DesignRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1");
        sqlx::query_as::<_, DesignRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a design by id and lock its row until the transaction ends.
    pub async fn find_by_id_for_update<'e, E>(
        executor: E,
        id: &str,
    ) -> Result<Option<DesignRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, DesignRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List a brand's designs, most recently updated first.
    pub async fn list_for_brand(
        pool: &PgPool,
        brand_id: &str,
    ) -> Result<Vec<DesignRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM designs
             WHERE brand_id = $1
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, DesignRow>(&query)
            .bind(brand_id)
            .fetch_all(pool)
            .await
    }

    /// List a brand's designs in one review state, oldest update first.
    pub async fn list_for_brand_with_status(
        pool: &PgPool,
        brand_id: &str,
        status: ApprovalStatus,
    ) -> Result<Vec<DesignRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM designs
             WHERE brand_id = $1 AND approval_status = $2
             ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, DesignRow>(&query)
            .bind(brand_id)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Overwrite a design. Returns `false` if no row has this id.
    pub async fn update<'e, E>(
        executor: E,
        design: &Design,
        document: &serde_json::Value,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE designs SET
                brand_id = $2,
                campaign_id = $3,
                approval_status = $4,
                document = $5,
                updated_at = $6
             WHERE id = $1",
        )
        .bind(&design.id)
        .bind(&design.brand_id)
        .bind(&design.campaign_id)
        .bind(design.approval().status().as_str())
        .bind(document)
        .bind(design.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a design. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM designs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
