//! Access policy consulted before every mutation and every scoped read.
//!
//! Each check re-derives the decision from the caller's identity and the
//! owning field of the resource; nothing is cached between calls.

use super::auth::{Identity, IdentityContext};
use super::domain::{Account, AccountId, Application, JobPosting, Role};
use super::error::{BoardError, Denial};

fn deny(identity: &Identity, action: &'static str) -> BoardError {
    tracing::warn!(subject = %identity.subject, role = %identity.role, action, "access denied");
    BoardError::forbidden(action)
}

/// Rejects anonymous callers.
pub fn require_identity(caller: &IdentityContext) -> Result<&Identity, BoardError> {
    caller.identity().ok_or_else(|| {
        tracing::warn!("anonymous caller rejected");
        BoardError::Unauthorized(Denial::Anonymous)
    })
}

fn require_role<'a>(
    caller: &'a IdentityContext,
    role: Role,
    action: &'static str,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    if identity.role == role {
        Ok(identity)
    } else {
        Err(deny(identity, action))
    }
}

/// Seekers and recruiters may sign themselves up; only admins create admins.
pub fn can_register(caller: &IdentityContext, role: Role) -> Result<(), BoardError> {
    if role != Role::Admin {
        return Ok(());
    }
    require_role(caller, Role::Admin, "create admin accounts").map(|_| ())
}

/// The account holder or an admin.
pub fn can_manage_account<'a>(
    caller: &'a IdentityContext,
    target: &AccountId,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    if identity.role == Role::Admin || &identity.subject == target {
        Ok(identity)
    } else {
        Err(deny(identity, "manage another account"))
    }
}

pub fn can_toggle_active(caller: &IdentityContext) -> Result<&Identity, BoardError> {
    require_role(caller, Role::Admin, "change account status")
}

pub fn can_list_accounts(caller: &IdentityContext) -> Result<&Identity, BoardError> {
    require_role(caller, Role::Admin, "list accounts")
}

/// A recruiter posting under their own id.
pub fn can_post_job<'a>(
    caller: &'a IdentityContext,
    posted_by: &AccountId,
) -> Result<&'a Identity, BoardError> {
    let identity = require_role(caller, Role::Recruiter, "post jobs")?;
    if &identity.subject == posted_by {
        Ok(identity)
    } else {
        Err(deny(identity, "post jobs for another recruiter"))
    }
}

/// The owning recruiter or any admin.
pub fn can_delete_job<'a>(
    caller: &'a IdentityContext,
    job: &JobPosting,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    match identity.role {
        Role::Admin => Ok(identity),
        Role::Recruiter if identity.subject == job.posted_by => Ok(identity),
        _ => Err(deny(identity, "delete this job")),
    }
}

/// A seeker applying as themselves.
pub fn can_submit<'a>(
    caller: &'a IdentityContext,
    applied_by: &AccountId,
) -> Result<&'a Identity, BoardError> {
    let identity = require_role(caller, Role::Seeker, "submit applications")?;
    if &identity.subject == applied_by {
        Ok(identity)
    } else {
        Err(deny(identity, "apply on behalf of another account"))
    }
}

/// The recruiter the application was snapshotted against.
pub fn can_decide<'a>(
    caller: &'a IdentityContext,
    application: &Application,
) -> Result<&'a Identity, BoardError> {
    let identity = require_role(caller, Role::Recruiter, "decide applications")?;
    if identity.subject == application.job_posted_by {
        Ok(identity)
    } else {
        Err(deny(identity, "decide applications for another recruiter's job"))
    }
}

pub fn can_read_application<'a>(
    caller: &'a IdentityContext,
    application: &Application,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    let permitted = identity.role == Role::Admin
        || identity.subject == application.applied_by
        || identity.subject == application.job_posted_by;
    if permitted {
        Ok(identity)
    } else {
        Err(deny(identity, "read this application"))
    }
}

pub fn can_list_for_applicant<'a>(
    caller: &'a IdentityContext,
    applicant: &AccountId,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    match identity.role {
        Role::Admin => Ok(identity),
        Role::Seeker if &identity.subject == applicant => Ok(identity),
        _ => Err(deny(identity, "list another applicant's applications")),
    }
}

pub fn can_list_for_recruiter<'a>(
    caller: &'a IdentityContext,
    recruiter: &AccountId,
) -> Result<&'a Identity, BoardError> {
    let identity = require_identity(caller)?;
    match identity.role {
        Role::Admin => Ok(identity),
        Role::Recruiter if &identity.subject == recruiter => Ok(identity),
        _ => Err(deny(identity, "list another recruiter's applications")),
    }
}

pub fn can_list_all_applications(caller: &IdentityContext) -> Result<&Identity, BoardError> {
    require_role(caller, Role::Admin, "list every application")
}

/// The acting account must still exist, hold the token's role, and be active.
pub fn require_active_actor(
    identity: &Identity,
    account: Option<Account>,
) -> Result<Account, BoardError> {
    match account {
        Some(account) if account.is_active && account.role() == identity.role => Ok(account),
        _ => {
            tracing::warn!(subject = %identity.subject, "acting account missing or inactive");
            Err(BoardError::Unauthorized(Denial::Suspended))
        }
    }
}
