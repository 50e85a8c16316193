//! In-memory stores for development and tests.
//!
//! State lives in an explicitly constructed value rather than a process-wide
//! singleton, so each test gets an isolated store.

use std::collections::HashMap;

use async_trait::async_trait;
use studio_core::approval::ApprovalStatus;
use studio_core::design::Design;
use studio_core::portal::PortalToken;
use studio_core::types::Timestamp;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{design_not_found, merge_saved_content, DesignStore, PortalTokenStore};

/// [`DesignStore`] holding designs in a map keyed by id.
#[derive(Default)]
pub struct InMemoryDesignStore {
    designs: RwLock<HashMap<String, Design>>,
}

impl InMemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DesignStore for InMemoryDesignStore {
    async fn insert(&self, design: &Design) -> Result<(), StoreError> {
        let mut designs = self.designs.write().await;
        if designs.contains_key(&design.id) {
            return Err(StoreError::Conflict(format!(
                "Design '{}' already exists",
                design.id
            )));
        }
        designs.insert(design.id.clone(), design.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Design>, StoreError> {
        Ok(self.designs.read().await.get(id).cloned())
    }

    async fn list_for_brand(&self, brand_id: &str) -> Result<Vec<Design>, StoreError> {
        let designs = self.designs.read().await;
        let mut found: Vec<Design> = designs
            .values()
            .filter(|d| d.brand_id == brand_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn list_for_brand_with_status(
        &self,
        brand_id: &str,
        status: ApprovalStatus,
    ) -> Result<Vec<Design>, StoreError> {
        let designs = self.designs.read().await;
        let mut found: Vec<Design> = designs
            .values()
            .filter(|d| d.brand_id == brand_id && d.approval().status() == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn update(&self, design: &Design) -> Result<(), StoreError> {
        let mut designs = self.designs.write().await;
        match designs.get_mut(&design.id) {
            Some(slot) => {
                *slot = design.clone();
                Ok(())
            }
            None => Err(design_not_found(&design.id)),
        }
    }

    async fn save_content(&self, design: &Design) -> Result<Design, StoreError> {
        let mut designs = self.designs.write().await;
        let slot = designs
            .get_mut(&design.id)
            .ok_or_else(|| design_not_found(&design.id))?;
        let merged = merge_saved_content(design, slot);
        *slot = merged.clone();
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.designs.write().await.remove(id).is_some())
    }
}

/// [`PortalTokenStore`] holding grants in a map keyed by token digest.
#[derive(Default)]
pub struct InMemoryPortalTokenStore {
    tokens: RwLock<HashMap<String, PortalToken>>,
}

impl InMemoryPortalTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortalTokenStore for InMemoryPortalTokenStore {
    async fn insert(&self, token: &PortalToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_hash) {
            return Err(StoreError::Conflict("Portal token already exists".to_string()));
        }
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<PortalToken>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token_hash)
            .filter(|t| t.is_active(now))
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token_hash) {
            Some(token) if !token.revoked => {
                token.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
