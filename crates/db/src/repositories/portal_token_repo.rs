//! Repository for the `portal_tokens` table.

use sqlx::PgPool;
use studio_core::portal::PortalToken;
use studio_core::types::Timestamp;

use crate::models::portal_token::PortalTokenRow;

/// Column list for portal_tokens queries.
const COLUMNS: &str = "token_hash, brand_id, client_email, created_at, expires_at, revoked";

/// Provides storage for client-portal grants.
pub struct PortalTokenRepo;

impl PortalTokenRepo {
    /// Insert a new grant.
    pub async fn create(pool: &PgPool, token: &PortalToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO portal_tokens
                (token_hash, brand_id, client_email, created_at, expires_at, revoked)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&token.token_hash)
        .bind(&token.brand_id)
        .bind(&token.client_email)
        .bind(token.created_at)
        .bind(token.expires_at)
        .bind(token.revoked)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find an unrevoked, unexpired grant by token digest.
    pub async fn find_active(
        pool: &PgPool,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<PortalTokenRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portal_tokens
             WHERE token_hash = $1 AND NOT revoked AND expires_at > $2"
        );
        sqlx::query_as::<_, PortalTokenRow>(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a grant. Returns `true` if an active grant was revoked.
    pub async fn revoke(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE portal_tokens SET revoked = TRUE
             WHERE token_hash = $1 AND NOT revoked",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
