use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::auth::{Identity, IdentityContext};
use super::domain::{Account, AccountId, ApplicationId, JobDraft, JobId, JobPosting};
use super::error::BoardError;
use super::policy;
use super::repository::{BoardStore, EntityKind};
use super::validation::validate_job_draft;

/// Outcome of a cascade delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedJob {
    pub job: JobPosting,
    pub removed_applications: Vec<ApplicationId>,
}

/// Owns job postings.
pub struct JobCatalog<R> {
    store: Arc<R>,
}

impl<R> JobCatalog<R>
where
    R: BoardStore + 'static,
{
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    fn active_actor(&self, identity: &Identity) -> Result<Account, BoardError> {
        let account = self.store.fetch_account(&identity.subject)?;
        policy::require_active_actor(identity, account)
    }

    /// Publishes a posting owned by `draft.posted_by`, who must be the
    /// calling recruiter and still active.
    pub fn post(
        &self,
        caller: &IdentityContext,
        draft: JobDraft,
    ) -> Result<JobPosting, BoardError> {
        let identity = policy::can_post_job(caller, &draft.posted_by)?;
        let recruiter = self.active_actor(identity)?;
        validate_job_draft(&draft)?;

        let company = match draft.company.as_deref().map(str::trim) {
            Some(company) => company.to_string(),
            None => recruiter.kind.company().unwrap_or_default().to_string(),
        };

        let job = JobPosting {
            id: JobId::generate(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            job_role: draft.job_role.trim().to_string(),
            company,
            posted_by: recruiter.id,
            posted_at: Utc::now(),
        };

        let stored = self.store.insert_job(job)?;
        tracing::info!(job_id = %stored.id, posted_by = %stored.posted_by, "posted job");
        Ok(stored)
    }

    pub fn list_all(&self) -> Result<Vec<JobPosting>, BoardError> {
        Ok(self.store.list_jobs(None)?)
    }

    pub fn list_by_owner(&self, owner: &AccountId) -> Result<Vec<JobPosting>, BoardError> {
        Ok(self.store.list_jobs(Some(owner))?)
    }

    pub fn get(&self, id: &JobId) -> Result<JobPosting, BoardError> {
        self.store
            .fetch_job(id)?
            .ok_or_else(|| BoardError::not_found(EntityKind::Job, id))
    }

    /// Removes the posting together with every application against it.
    pub fn delete(&self, caller: &IdentityContext, id: &JobId) -> Result<DeletedJob, BoardError> {
        policy::require_identity(caller)?;
        let job = self.get(id)?;
        let identity = policy::can_delete_job(caller, &job)?;
        self.active_actor(identity)?;

        let (job, removed) = self.store.delete_job_cascade(id)?;
        let removed_applications: Vec<ApplicationId> =
            removed.into_iter().map(|application| application.id).collect();

        tracing::info!(
            job_id = %job.id,
            by = %identity.subject,
            removed = removed_applications.len(),
            "deleted job and its applications"
        );
        Ok(DeletedJob {
            job,
            removed_applications,
        })
    }
}
