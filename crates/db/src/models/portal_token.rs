use sqlx::FromRow;
use studio_core::portal::PortalToken;
use studio_core::types::Timestamp;

/// A row from the `portal_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct PortalTokenRow {
    pub token_hash: String,
    pub brand_id: String,
    pub client_email: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked: bool,
}

impl From<PortalTokenRow> for PortalToken {
    fn from(row: PortalTokenRow) -> Self {
        PortalToken {
            token_hash: row.token_hash,
            brand_id: row.brand_id,
            client_email: row.client_email,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked: row.revoked,
        }
    }
}
