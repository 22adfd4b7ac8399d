use std::sync::Arc;

use super::accounts::AccountDirectory;
use super::applications::ApplicationLedger;
use super::auth::{AuthGateway, PasswordHasher, TokenService};
use super::jobs::JobCatalog;
use super::repository::BoardStore;

/// The four components wired over one shared store.
pub struct JobBoardService<R> {
    auth: AuthGateway<R>,
    accounts: AccountDirectory<R>,
    jobs: JobCatalog<R>,
    applications: ApplicationLedger<R>,
}

impl<R> JobBoardService<R>
where
    R: BoardStore + 'static,
{
    pub fn new(store: Arc<R>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            auth: AuthGateway::new(store.clone(), hasher.clone(), tokens),
            accounts: AccountDirectory::new(store.clone(), hasher),
            jobs: JobCatalog::new(store.clone()),
            applications: ApplicationLedger::new(store),
        }
    }

    pub fn auth(&self) -> &AuthGateway<R> {
        &self.auth
    }

    pub fn accounts(&self) -> &AccountDirectory<R> {
        &self.accounts
    }

    pub fn jobs(&self) -> &JobCatalog<R> {
        &self.jobs
    }

    pub fn applications(&self) -> &ApplicationLedger<R> {
        &self.applications
    }
}
