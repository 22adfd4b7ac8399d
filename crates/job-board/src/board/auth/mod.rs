//! Credential checks and identity resolution.

mod password;
mod token;

use std::sync::Arc;

use super::domain::{AccountId, Role};
use super::error::BoardError;
use super::repository::BoardStore;

pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenService};

/// Subject and role proven by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: AccountId,
    pub role: Role,
}

/// Who is calling: a verified identity or nobody.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityContext {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl IdentityContext {
    pub fn authenticated(subject: AccountId, role: Role) -> Self {
        Self::Authenticated(Identity { subject, role })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityContext::Anonymous => None,
            IdentityContext::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, IdentityContext::Anonymous)
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Issues tokens for valid credentials and resolves tokens back to identities.
pub struct AuthGateway<R> {
    store: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl<R> AuthGateway<R>
where
    R: BoardStore + 'static,
{
    pub fn new(store: Arc<R>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Exchanges an email and password for a signed token.
    pub fn issue_token(&self, email: &str, password: &str) -> Result<String, BoardError> {
        let email = normalize_email(email);
        let account = self
            .store
            .find_account_by_email(&email)?
            .ok_or(BoardError::InvalidCredentials)?;

        if !self.hasher.verify(password, &account.password_hash) {
            tracing::warn!(account_id = %account.id, "password mismatch");
            return Err(BoardError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.id, account.role())?;
        tracing::info!(account_id = %account.id, role = %account.role(), "issued identity token");
        Ok(token)
    }

    /// Resolves a raw token; anything missing, malformed or expired is anonymous.
    pub fn verify_token(&self, token: Option<&str>) -> IdentityContext {
        let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
            return IdentityContext::Anonymous;
        };

        match self.tokens.verify(token) {
            Ok(claims) => IdentityContext::authenticated(AccountId(claims.sub), claims.role),
            Err(err) => {
                tracing::debug!(%err, "treating caller as anonymous");
                IdentityContext::Anonymous
            }
        }
    }
}
