//! JWT token issuing and validation
//!
//! Keys are derived once from the configured secret and shared behind `Arc`.

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use fitness_tracker_shared::types::AuthTokens;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Which half of a token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenKind,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Ok(Uuid::parse_str(&self.sub)?)
    }
}

/// Issues and checks tokens with pre-computed keys.
///
/// Build once at startup and keep in `AppState`; clones share the keys.
#[derive(Clone)]
pub struct JwtService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Sign a token of the given kind for `user_id`
    pub fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            token_type: kind,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign {:?} token: {}", kind, e))
    }

    /// Fresh access + refresh pair
    pub fn issue_pair(&self, user_id: Uuid) -> Result<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.issue(user_id, TokenKind::Access)?,
            refresh_token: self.issue(user_id, TokenKind::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_secs,
        })
    }

    /// Check signature, expiry and kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;
        if data.claims.token_type != expected {
            bail!("Expected a {:?} token", expected);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", 3600, 604800)
    }

    #[test]
    fn test_issue_and_validate_each_kind() {
        let service = service();
        let user_id = Uuid::new_v4();

        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let token = service.issue(user_id, kind).unwrap();
            let claims = service.validate(&token, kind).unwrap();
            assert_eq!(claims.user_id().unwrap(), user_id);
            assert_eq!(claims.token_type, kind);
        }
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let service = service();
        let token = service.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(service.validate(&token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_pair_reports_access_ttl() {
        let pair = service().issue_pair(Uuid::new_v4()).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_foreign_or_garbage_tokens_rejected() {
        let token = JwtService::new("other-secret", 60, 60)
            .issue(Uuid::new_v4(), TokenKind::Access)
            .unwrap();
        assert!(service().validate(&token, TokenKind::Access).is_err());
        assert!(service().validate("invalid.token.here", TokenKind::Access).is_err());
    }
}
