use sqlx::FromRow;
use studio_core::design::Design;
use studio_core::types::Timestamp;

/// A row from the `designs` table.
#[derive(Debug, Clone, FromRow)]
pub struct DesignRow {
    pub id: String,
    pub brand_id: String,
    pub campaign_id: Option<String>,
    pub approval_status: String,
    pub document: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DesignRow {
    /// Decode the stored document.
    pub fn into_design(self) -> Result<Design, serde_json::Error> {
        serde_json::from_value(self.document)
    }
}
