//! Client-portal access tokens.
//!
//! A portal token lets an agency client review one brand's pending designs
//! without an account. The plaintext is shown once at issue time; only its
//! SHA-256 digest is stored.

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Length of the generated token string (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// Default token lifetime: one week.
pub const DEFAULT_TTL_HOURS: i64 = 168;

/// Longest lifetime a token may be issued with: 90 days.
pub const MAX_TTL_HOURS: i64 = 24 * 90;

/// A freshly generated token.
pub struct GeneratedPortalToken {
    /// Returned to the issuer exactly once, never stored.
    pub plaintext: String,
    /// SHA-256 hex digest of the plaintext (stored).
    pub hash: String,
}

/// Generate a new random portal token.
pub fn generate_portal_token() -> GeneratedPortalToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_portal_token(&plaintext);
    GeneratedPortalToken { plaintext, hash }
}

/// SHA-256 hex digest of a token, used both at issue and at lookup.
pub fn hash_portal_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Validate a requested token lifetime.
pub fn validate_ttl_hours(hours: i64) -> Result<(), CoreError> {
    if hours <= 0 || hours > MAX_TTL_HOURS {
        return Err(CoreError::Validation(format!(
            "Token lifetime must be between 1 and {MAX_TTL_HOURS} hours, got {hours}"
        )));
    }
    Ok(())
}

/// Stored portal grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalToken {
    pub token_hash: String,
    pub brand_id: EntityId,
    pub client_email: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked: bool,
}

impl PortalToken {
    /// Build a grant for `brand_id` that expires `ttl_hours` after `now`.
    pub fn issue(
        token_hash: String,
        brand_id: &str,
        client_email: &str,
        ttl_hours: i64,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        validate_ttl_hours(ttl_hours)?;
        if brand_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "brand_id must not be empty".to_string(),
            ));
        }
        let email = client_email.trim();
        if !email.contains('@') {
            return Err(CoreError::Validation(format!(
                "Invalid client email '{client_email}'"
            )));
        }
        Ok(Self {
            token_hash,
            brand_id: brand_id.trim().to_string(),
            client_email: email.to_lowercase(),
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
            revoked: false,
        })
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.revoked && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn generated_token_shape() {
        let token = generate_portal_token();
        assert_eq!(token.plaintext.len(), TOKEN_LENGTH);
        assert!(token.plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(token.hash, hash_portal_token(&token.plaintext));
        assert_eq!(token.hash.len(), 64);
    }

    #[test]
    fn tokens_differ() {
        assert_ne!(generate_portal_token().plaintext, generate_portal_token().plaintext);
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_portal_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn issue_sets_expiry() {
        let now = Utc::now();
        let grant = PortalToken::issue("h".into(), "brand-1", " Client@Example.com ", 24, now).unwrap();
        assert_eq!(grant.client_email, "client@example.com");
        assert_eq!(grant.expires_at, now + Duration::hours(24));
        assert!(grant.is_active(now));
        assert!(!grant.is_active(now + Duration::hours(24)));
    }

    #[test]
    fn revoked_token_is_inactive() {
        let now = Utc::now();
        let mut grant = PortalToken::issue("h".into(), "brand-1", "a@b.co", 1, now).unwrap();
        grant.revoked = true;
        assert!(!grant.is_active(now));
    }

    #[test]
    fn issue_validates_input() {
        let now = Utc::now();
        assert!(PortalToken::issue("h".into(), "", "a@b.co", 1, now).is_err());
        assert!(PortalToken::issue("h".into(), "b", "not-an-email", 1, now).is_err());
        assert!(PortalToken::issue("h".into(), "b", "a@b.co", 0, now).is_err());
        assert!(PortalToken::issue("h".into(), "b", "a@b.co", MAX_TTL_HOURS + 1, now).is_err());
    }
}
