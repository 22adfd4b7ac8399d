//! Accounts, job postings and applications behind one access policy.
//!
//! [`JobBoardService`] wires the auth gateway, account directory, job
//! catalog and application ledger over a shared [`BoardStore`]. Every
//! mutating operation takes the caller's [`IdentityContext`] and consults
//! [`policy`] against the resource's owning field before touching the store.

pub mod accounts;
pub mod applications;
pub mod auth;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod memory;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use accounts::AccountDirectory;
pub use applications::ApplicationLedger;
pub use auth::{AuthGateway, Identity, IdentityContext, PasswordHasher, TokenService};
pub use domain::{
    Account, AccountId, AccountKind, AccountView, ApplicantProfile, Application, ApplicationId,
    ApplicationStatus, ApplicationSubmission, ApplicationView, DecisionRecord, JobDraft, JobId,
    JobPosting, ProfileUpdate, Registration, Role,
};
pub use error::{BoardError, Denial};
pub use jobs::{DeletedJob, JobCatalog};
pub use memory::InMemoryBoardStore;
pub use repository::{BoardStore, EntityKind, RepositoryError, UniqueField};
pub use router::board_router;
pub use service::JobBoardService;
pub use validation::ValidationError;
