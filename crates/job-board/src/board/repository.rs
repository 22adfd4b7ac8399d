use std::fmt;

use super::domain::{
    Account, AccountId, Application, ApplicationId, ApplicationStatus, DecisionRecord, JobId,
    JobPosting, Role,
};

/// Account fields that must be unique across the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
    Phone,
}

impl UniqueField {
    pub const fn label(self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Username => "username",
            UniqueField::Phone => "phone",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity kinds named in lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Job,
    Application,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Account => "account",
            EntityKind::Job => "job",
            EntityKind::Application => "application",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{field} is already registered")]
    Duplicate { field: UniqueField },
    #[error("{entity} '{id}' not found")]
    Missing { entity: EntityKind, id: String },
    #[error("application is already {current}")]
    StatusConflict { current: ApplicationStatus },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn missing(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::Missing {
            entity,
            id: id.to_string(),
        }
    }
}

/// Storage abstraction shared by the directory, the catalog and the ledger.
///
/// Every method is one atomic unit as observed by concurrent callers.
pub trait BoardStore: Send + Sync {
    /// Inserts the account unless its email, username or phone is taken.
    fn insert_account(&self, account: Account) -> Result<Account, RepositoryError>;
    fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
    fn list_accounts(&self, role: Option<Role>) -> Result<Vec<Account>, RepositoryError>;
    fn count_accounts(&self) -> Result<usize, RepositoryError>;
    /// Applies `change` to the stored account and commits it if the unique
    /// fields still hold; nothing is written when the change is rejected.
    fn modify_account(
        &self,
        id: &AccountId,
        change: &mut dyn FnMut(&mut Account),
    ) -> Result<Account, RepositoryError>;

    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn list_jobs(&self, posted_by: Option<&AccountId>) -> Result<Vec<JobPosting>, RepositoryError>;
    /// Removes the job and every application referencing it together.
    fn delete_job_cascade(
        &self,
        id: &JobId,
    ) -> Result<(JobPosting, Vec<Application>), RepositoryError>;

    /// Inserts the application only while its job still exists.
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn applications_by_applicant(
        &self,
        applicant: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn applications_by_recruiter(
        &self,
        recruiter: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn list_applications(&self) -> Result<Vec<Application>, RepositoryError>;
    /// Moves the application to `next` only if it is currently `expected`.
    fn transition_application(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        decision: DecisionRecord,
    ) -> Result<Application, RepositoryError>;
}
