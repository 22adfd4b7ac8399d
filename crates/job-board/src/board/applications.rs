use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::auth::{Identity, IdentityContext};
use super::domain::{
    Account, AccountId, AccountView, Application, ApplicationId, ApplicationStatus,
    ApplicationSubmission, ApplicationView, DecisionRecord, JobId, JobPosting,
};
use super::error::BoardError;
use super::policy;
use super::repository::{BoardStore, EntityKind, RepositoryError};
use super::validation::validate_applicant;

/// Owns applications and their pending → decided lifecycle.
pub struct ApplicationLedger<R> {
    store: Arc<R>,
}

impl<R> ApplicationLedger<R>
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

    /// Records a seeker's application against an existing job.
    ///
    /// Nothing is written unless every field validates and the job still
    /// exists at the moment of insertion.
    pub fn submit(
        &self,
        caller: &IdentityContext,
        job_id: &JobId,
        submission: ApplicationSubmission,
    ) -> Result<Application, BoardError> {
        let identity = policy::can_submit(caller, &submission.applied_by)?;
        self.active_actor(identity)?;
        validate_applicant(&submission.profile)?;

        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| BoardError::not_found(EntityKind::Job, job_id))?;

        let ApplicationSubmission {
            applied_by,
            mut profile,
        } = submission;
        profile.skills = profile
            .skills
            .iter()
            .map(|skill| skill.trim().to_string())
            .collect();

        let application = Application {
            id: ApplicationId::generate(),
            profile,
            company_name: job.company,
            job_id: job.id,
            job_posted_by: job.posted_by,
            applied_by,
            status: ApplicationStatus::Pending,
            applied_time: Utc::now(),
            decision: None,
        };

        let stored = self.store.insert_application(application)?;
        tracing::info!(
            application_id = %stored.id,
            job_id = %stored.job_id,
            applied_by = %stored.applied_by,
            "submitted application"
        );
        Ok(stored)
    }

    /// Moves a pending application to a terminal status, recording who decided.
    pub fn decide(
        &self,
        caller: &IdentityContext,
        id: &ApplicationId,
        requested: ApplicationStatus,
    ) -> Result<Application, BoardError> {
        policy::require_identity(caller)?;
        let application = self.load(id)?;
        let identity = policy::can_decide(caller, &application)?;
        self.active_actor(identity)?;

        if !application.status.can_transition_to(requested) {
            return Err(BoardError::InvalidTransition {
                from: application.status,
                requested,
            });
        }

        let decision = DecisionRecord {
            decided_by: identity.subject.clone(),
            decided_at: Utc::now(),
        };

        match self.store.transition_application(
            id,
            ApplicationStatus::Pending,
            requested,
            decision,
        ) {
            Ok(decided) => {
                tracing::info!(
                    application_id = %decided.id,
                    status = %decided.status,
                    by = %identity.subject,
                    "decided application"
                );
                Ok(decided)
            }
            Err(RepositoryError::StatusConflict { current }) => {
                tracing::warn!(application_id = %id, %current, "lost decision race");
                Err(BoardError::InvalidTransition {
                    from: current,
                    requested,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn get(
        &self,
        caller: &IdentityContext,
        id: &ApplicationId,
    ) -> Result<Application, BoardError> {
        let application = self.load(id)?;
        policy::can_read_application(caller, &application)?;
        Ok(application)
    }

    /// Applications a seeker submitted, joined with job and recruiter.
    pub fn list_by_applicant(
        &self,
        caller: &IdentityContext,
        applicant: &AccountId,
    ) -> Result<Vec<ApplicationView>, BoardError> {
        policy::can_list_for_applicant(caller, applicant)?;
        let applications = self.store.applications_by_applicant(applicant)?;
        self.join(applications)
    }

    /// Applications against jobs the recruiter posted, joined with job and applicant.
    pub fn list_by_recruiter(
        &self,
        caller: &IdentityContext,
        recruiter: &AccountId,
    ) -> Result<Vec<ApplicationView>, BoardError> {
        policy::can_list_for_recruiter(caller, recruiter)?;
        let applications = self.store.applications_by_recruiter(recruiter)?;
        self.join(applications)
    }

    pub fn list_all(&self, caller: &IdentityContext) -> Result<Vec<ApplicationView>, BoardError> {
        policy::can_list_all_applications(caller)?;
        let applications = self.store.list_applications()?;
        self.join(applications)
    }

    fn load(&self, id: &ApplicationId) -> Result<Application, BoardError> {
        self.store
            .fetch_application(id)?
            .ok_or_else(|| BoardError::not_found(EntityKind::Application, id))
    }

    fn join(&self, applications: Vec<Application>) -> Result<Vec<ApplicationView>, BoardError> {
        let mut jobs: HashMap<JobId, Option<JobPosting>> = HashMap::new();
        let mut accounts: HashMap<AccountId, Option<AccountView>> = HashMap::new();

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let job = match jobs.get(&application.job_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = self.store.fetch_job(&application.job_id)?;
                    jobs.insert(application.job_id.clone(), fetched.clone());
                    fetched
                }
            };
            let applicant = self.account_view(&mut accounts, &application.applied_by)?;
            let recruiter = self.account_view(&mut accounts, &application.job_posted_by)?;

            views.push(ApplicationView {
                application,
                job,
                applicant,
                recruiter,
            });
        }
        Ok(views)
    }

    fn account_view(
        &self,
        cache: &mut HashMap<AccountId, Option<AccountView>>,
        id: &AccountId,
    ) -> Result<Option<AccountView>, BoardError> {
        if let Some(cached) = cache.get(id) {
            return Ok(cached.clone());
        }
        let view = self.store.fetch_account(id)?.map(|account| account.view());
        cache.insert(id.clone(), view.clone());
        Ok(view)
    }
}
