//! Signed identity tokens.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::board::domain::{AccountId, Role};

const MAX_TTL_HOURS: i64 = 24 * 365 * 10;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid")]
    Invalid,
    #[error("token could not be signed")]
    Signing,
}

/// HS256 token issuer and verifier.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<String>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_hours: u64) -> Self {
        let hours = i64::try_from(ttl_hours)
            .unwrap_or(MAX_TTL_HOURS)
            .min(MAX_TTL_HOURS);
        Self {
            secret: Arc::new(secret.into()),
            ttl: Duration::hours(hours),
        }
    }

    pub fn issue(&self, subject: &AccountId, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.0.clone(),
            role,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| {
            tracing::error!(%err, "failed to encode identity token");
            TokenError::Signing
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }

    #[cfg(test)]
    pub(crate) fn sign_claims(&self, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test claims encode")
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_subject_and_role() {
        let service = TokenService::new("unit-test-secret", 24);
        let subject = AccountId::from("acct-42");
        let token = service.issue(&subject, Role::Recruiter).expect("issues");

        let claims = service.verify(&token).expect("verifies");
        assert_eq!(claims.sub, "acct-42");
        assert_eq!(claims.role, Role::Recruiter);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_foreign_signature() {
        let issuer = TokenService::new("one-secret", 24);
        let verifier = TokenService::new("another-secret", 24);
        let token = issuer
            .issue(&AccountId::from("acct-1"), Role::Admin)
            .expect("issues");

        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
        assert_eq!(verifier.verify("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn reports_expiry() {
        let service = TokenService::new("unit-test-secret", 24);
        let issued = Utc::now().timestamp() as usize - 7_200;
        let token = service.sign_claims(&Claims {
            sub: "acct-1".to_string(),
            role: Role::Seeker,
            exp: issued + 60,
            iat: issued,
        });

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }
}
