use std::sync::Arc;

use chrono::Utc;

use super::auth::{normalize_email, Identity, IdentityContext, PasswordHasher};
use super::domain::{
    Account, AccountId, AccountKind, AccountView, ProfileUpdate, Registration, Role,
};
use super::error::BoardError;
use super::policy;
use super::repository::{BoardStore, EntityKind};
use super::validation::{validate_profile_update, validate_registration};

/// Owns account records: registration, profile edits, status and pictures.
pub struct AccountDirectory<R> {
    store: Arc<R>,
    hasher: PasswordHasher,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

impl<R> AccountDirectory<R>
where
    R: BoardStore + 'static,
{
    pub fn new(store: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    fn active_actor(&self, identity: &Identity) -> Result<Account, BoardError> {
        let account = self.store.fetch_account(&identity.subject)?;
        policy::require_active_actor(identity, account)
    }

    /// Creates an account after validating it and hashing its password.
    pub fn register(
        &self,
        caller: &IdentityContext,
        registration: Registration,
    ) -> Result<AccountView, BoardError> {
        policy::can_register(caller, registration.role)?;
        let kind = validate_registration(&registration)?;
        let account = self.build_account(&registration, kind)?;

        let stored = self.store.insert_account(account)?;
        tracing::info!(account_id = %stored.id, role = %stored.role(), "registered account");
        Ok(stored.view())
    }

    /// Creates the bootstrap administrator unless the email is already taken.
    pub fn seed_admin(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Option<AccountView>, BoardError> {
        if let Some(existing) = self.store.find_account_by_email(&normalize_email(email))? {
            tracing::debug!(account_id = %existing.id, "administrator already present");
            return Ok(None);
        }

        let registration = Registration {
            email: email.to_string(),
            username: username.to_string(),
            first_name: "Platform".to_string(),
            last_name: "Administrator".to_string(),
            phone: None,
            password: password.to_string(),
            role: Role::Admin,
            company: None,
        };
        let kind = validate_registration(&registration)?;
        let account = self.build_account(&registration, kind)?;

        let stored = self.store.insert_account(account)?;
        tracing::info!(account_id = %stored.id, "seeded administrator account");
        Ok(Some(stored.view()))
    }

    fn build_account(
        &self,
        registration: &Registration,
        kind: AccountKind,
    ) -> Result<Account, BoardError> {
        let password_hash = self.hasher.hash(&registration.password)?;
        Ok(Account {
            id: AccountId::generate(),
            email: normalize_email(&registration.email),
            username: trimmed(&registration.username),
            phone: registration
                .phone
                .as_deref()
                .map(trimmed)
                .filter(|phone| !phone.is_empty()),
            first_name: trimmed(&registration.first_name),
            last_name: trimmed(&registration.last_name),
            kind,
            password_hash,
            profile_picture: String::new(),
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn get(&self, caller: &IdentityContext, id: &AccountId) -> Result<AccountView, BoardError> {
        policy::can_manage_account(caller, id)?;
        self.load(id).map(|account| account.view())
    }

    /// Every account, or only those holding `role`.
    pub fn list(
        &self,
        caller: &IdentityContext,
        role: Option<Role>,
    ) -> Result<Vec<AccountView>, BoardError> {
        policy::can_list_accounts(caller)?;
        let accounts = self.store.list_accounts(role)?;
        Ok(accounts.iter().map(Account::view).collect())
    }

    /// Applies only the supplied fields; a new password is hashed first.
    pub fn update_profile(
        &self,
        caller: &IdentityContext,
        id: &AccountId,
        update: ProfileUpdate,
    ) -> Result<AccountView, BoardError> {
        let identity = policy::can_manage_account(caller, id)?;
        self.active_actor(identity)?;
        let current = self.load(id)?;
        validate_profile_update(&update, &current.kind)?;

        let password_hash = update
            .password
            .as_deref()
            .map(|password| self.hasher.hash(password))
            .transpose()?;

        let updated = self.store.modify_account(id, &mut |account: &mut Account| {
            if let Some(first_name) = &update.first_name {
                account.first_name = trimmed(first_name);
            }
            if let Some(last_name) = &update.last_name {
                account.last_name = trimmed(last_name);
            }
            if let Some(email) = &update.email {
                account.email = normalize_email(email);
            }
            if let Some(username) = &update.username {
                account.username = trimmed(username);
            }
            if let Some(phone) = &update.phone {
                account.phone = Some(trimmed(phone));
            }
            if let (Some(company), AccountKind::Recruiter { company: current }) =
                (&update.company, &mut account.kind)
            {
                *current = trimmed(company);
            }
            if let Some(digest) = &password_hash {
                account.password_hash = digest.clone();
            }
        })?;

        tracing::info!(account_id = %updated.id, "updated account profile");
        Ok(updated.view())
    }

    /// Suspends an active account or restores a suspended one.
    pub fn toggle_active(
        &self,
        caller: &IdentityContext,
        id: &AccountId,
    ) -> Result<AccountView, BoardError> {
        let admin = policy::can_toggle_active(caller)?;
        self.active_actor(admin)?;
        let updated = self.store.modify_account(id, &mut |account: &mut Account| {
            account.is_active = !account.is_active;
        })?;

        tracing::info!(
            account_id = %updated.id,
            by = %admin.subject,
            is_active = updated.is_active,
            "toggled account status"
        );
        Ok(updated.view())
    }

    pub fn set_profile_picture(
        &self,
        caller: &IdentityContext,
        id: &AccountId,
        picture: String,
    ) -> Result<AccountView, BoardError> {
        let identity = policy::can_manage_account(caller, id)?;
        self.active_actor(identity)?;
        let updated = self.store.modify_account(id, &mut |account: &mut Account| {
            account.profile_picture = picture.clone();
        })?;
        tracing::info!(account_id = %updated.id, bytes = picture.len(), "replaced profile picture");
        Ok(updated.view())
    }

    pub fn clear_profile_picture(
        &self,
        caller: &IdentityContext,
        id: &AccountId,
    ) -> Result<AccountView, BoardError> {
        let identity = policy::can_manage_account(caller, id)?;
        self.active_actor(identity)?;
        let updated = self.store.modify_account(id, &mut |account: &mut Account| {
            account.profile_picture.clear();
        })?;
        tracing::info!(account_id = %updated.id, "cleared profile picture");
        Ok(updated.view())
    }

    fn load(&self, id: &AccountId) -> Result<Account, BoardError> {
        self.store
            .fetch_account(id)?
            .ok_or_else(|| BoardError::not_found(EntityKind::Account, id))
    }
}
