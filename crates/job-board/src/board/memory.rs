use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Account, AccountId, Application, ApplicationId, ApplicationStatus, DecisionRecord, JobId,
    JobPosting, Role,
};
use super::repository::{BoardStore, EntityKind, RepositoryError, UniqueField};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    jobs: HashMap<JobId, JobPosting>,
    applications: HashMap<ApplicationId, Application>,
}

impl Tables {
    fn conflicting_field(&self, candidate: &Account) -> Option<UniqueField> {
        self.accounts
            .values()
            .filter(|existing| existing.id != candidate.id)
            .find_map(|existing| {
                if existing.email == candidate.email {
                    Some(UniqueField::Email)
                } else if existing.username == candidate.username {
                    Some(UniqueField::Username)
                } else if candidate.phone.is_some() && existing.phone == candidate.phone {
                    Some(UniqueField::Phone)
                } else {
                    None
                }
            })
    }
}

/// Process-local store; one lock serializes every write so each trait
/// method commits as a single unit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBoardStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

fn newest_jobs_first(jobs: &mut [JobPosting]) {
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then_with(|| a.id.cmp(&b.id)));
}

fn oldest_applications_first(applications: &mut [Application]) {
    applications.sort_by(|a, b| {
        a.applied_time
            .cmp(&b.applied_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl BoardStore for InMemoryBoardStore {
    fn insert_account(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(field) = tables.conflicting_field(&account) {
            return Err(RepositoryError::Duplicate { field });
        }
        tables.accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.tables()?.accounts.get(id).cloned())
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    fn list_accounts(&self, role: Option<Role>) -> Result<Vec<Account>, RepositoryError> {
        let tables = self.tables()?;
        let mut accounts: Vec<Account> = tables
            .accounts
            .values()
            .filter(|account| role.map_or(true, |role| account.role() == role))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(accounts)
    }

    fn count_accounts(&self) -> Result<usize, RepositoryError> {
        Ok(self.tables()?.accounts.len())
    }

    fn modify_account(
        &self,
        id: &AccountId,
        change: &mut dyn FnMut(&mut Account),
    ) -> Result<Account, RepositoryError> {
        let mut tables = self.tables()?;
        let mut updated = tables
            .accounts
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::missing(EntityKind::Account, id))?;

        change(&mut updated);
        updated.id = id.clone();

        if let Some(field) = tables.conflicting_field(&updated) {
            return Err(RepositoryError::Duplicate { field });
        }
        tables.accounts.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut tables = self.tables()?;
        tables.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.tables()?.jobs.get(id).cloned())
    }

    fn list_jobs(&self, posted_by: Option<&AccountId>) -> Result<Vec<JobPosting>, RepositoryError> {
        let tables = self.tables()?;
        let mut jobs: Vec<JobPosting> = tables
            .jobs
            .values()
            .filter(|job| posted_by.map_or(true, |owner| &job.posted_by == owner))
            .cloned()
            .collect();
        newest_jobs_first(&mut jobs);
        Ok(jobs)
    }

    fn delete_job_cascade(
        &self,
        id: &JobId,
    ) -> Result<(JobPosting, Vec<Application>), RepositoryError> {
        let mut tables = self.tables()?;
        let job = tables
            .jobs
            .remove(id)
            .ok_or_else(|| RepositoryError::missing(EntityKind::Job, id))?;

        let dependent: Vec<ApplicationId> = tables
            .applications
            .values()
            .filter(|application| &application.job_id == id)
            .map(|application| application.id.clone())
            .collect();
        let mut removed: Vec<Application> = dependent
            .iter()
            .filter_map(|application_id| tables.applications.remove(application_id))
            .collect();
        oldest_applications_first(&mut removed);

        Ok((job, removed))
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.jobs.contains_key(&application.job_id) {
            return Err(RepositoryError::missing(
                EntityKind::Job,
                &application.job_id,
            ));
        }
        tables
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.tables()?.applications.get(id).cloned())
    }

    fn applications_by_applicant(
        &self,
        applicant: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let tables = self.tables()?;
        let mut applications: Vec<Application> = tables
            .applications
            .values()
            .filter(|application| &application.applied_by == applicant)
            .cloned()
            .collect();
        oldest_applications_first(&mut applications);
        Ok(applications)
    }

    fn applications_by_recruiter(
        &self,
        recruiter: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let tables = self.tables()?;
        let mut applications: Vec<Application> = tables
            .applications
            .values()
            .filter(|application| &application.job_posted_by == recruiter)
            .cloned()
            .collect();
        oldest_applications_first(&mut applications);
        Ok(applications)
    }

    fn list_applications(&self) -> Result<Vec<Application>, RepositoryError> {
        let tables = self.tables()?;
        let mut applications: Vec<Application> = tables.applications.values().cloned().collect();
        oldest_applications_first(&mut applications);
        Ok(applications)
    }

    fn transition_application(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        decision: DecisionRecord,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.tables()?;
        let application = tables
            .applications
            .get_mut(id)
            .ok_or_else(|| RepositoryError::missing(EntityKind::Application, id))?;

        if application.status != expected {
            return Err(RepositoryError::StatusConflict {
                current: application.status,
            });
        }

        application.status = next;
        application.decision = Some(decision);
        Ok(application.clone())
    }
}
