use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

identifier!(
    /// Identifier wrapper for accounts.
    AccountId
);
identifier!(
    /// Identifier wrapper for job postings.
    JobId
);
identifier!(
    /// Identifier wrapper for submitted applications.
    ApplicationId
);

/// The three fixed roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Seeker,
    Recruiter,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role together with the fields only some roles carry.
///
/// Recruiters always have a company; seekers and admins never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum AccountKind {
    Seeker,
    Recruiter { company: String },
    Admin,
}

impl AccountKind {
    pub fn role(&self) -> Role {
        match self {
            AccountKind::Seeker => Role::Seeker,
            AccountKind::Recruiter { .. } => Role::Recruiter,
            AccountKind::Admin => Role::Admin,
        }
    }

    pub fn company(&self) -> Option<&str> {
        match self {
            AccountKind::Recruiter { company } => Some(company),
            AccountKind::Seeker | AccountKind::Admin => None,
        }
    }
}

/// Argon2 PHC string. Never holds plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub(crate) fn from_phc(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Stored identity record for a seeker, recruiter, or admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub kind: AccountKind,
    pub password_hash: PasswordDigest,
    pub profile_picture: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Role {
        self.kind.role()
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            phone: self.phone.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            kind: self.kind.clone(),
            profile_picture: self.profile_picture.clone(),
            is_active: self.is_active,
        }
    }
}

/// Account projection safe to hand to callers: no password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(flatten)]
    pub kind: AccountKind,
    pub profile_picture: String,
    pub is_active: bool,
}

/// Self-service registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub company: Option<String>,
}

/// Partial profile edit; only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Fields a recruiter supplies when posting a job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub job_role: String,
    /// Overrides the recruiter's own company when present.
    #[serde(default)]
    pub company: Option<String>,
    pub posted_by: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub job_role: String,
    pub company: String,
    pub posted_by: AccountId,
    pub posted_at: DateTime<Utc>,
}

/// Contact and profile details an applicant submits with an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub years_of_experience: i32,
    pub skills: Vec<String>,
    #[serde(default)]
    pub current_job_title: Option<String>,
    pub expected_salary: f64,
    /// Message to the recruiter.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub applied_by: AccountId,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
}

/// Lifecycle of an application: pending, then exactly one terminal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (
                ApplicationStatus::Pending,
                ApplicationStatus::Shortlisted | ApplicationStatus::Rejected
            )
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who moved an application out of pending, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decided_by: AccountId,
    pub decided_at: DateTime<Utc>,
}

/// Stored application with the job fields captured at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub company_name: String,
    pub job_id: JobId,
    pub job_posted_by: AccountId,
    pub applied_by: AccountId,
    pub status: ApplicationStatus,
    pub applied_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionRecord>,
}

/// Application joined with its job and the accounts on either side.
///
/// Joined entities are optional so a listing racing a delete still renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationView {
    pub application: Application,
    pub job: Option<JobPosting>,
    pub applicant: Option<AccountView>,
    pub recruiter: Option<AccountView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_transitions_to_a_decision() {
        use ApplicationStatus::*;

        assert!(Pending.can_transition_to(Shortlisted));
        assert!(Pending.can_transition_to(Rejected));
        for from in [Pending, Shortlisted, Rejected] {
            assert!(!from.can_transition_to(Pending));
        }
        assert!(!Shortlisted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Shortlisted));
        assert!(Shortlisted.is_terminal() && Rejected.is_terminal());
    }

    #[test]
    fn account_view_flattens_role_and_hides_digest() {
        let account = Account {
            id: AccountId::from("acct-1"),
            email: "rita@acme.test".to_string(),
            username: "rita".to_string(),
            phone: None,
            first_name: "Rita".to_string(),
            last_name: "Ramos".to_string(),
            kind: AccountKind::Recruiter {
                company: "Acme".to_string(),
            },
            password_hash: PasswordDigest::from_phc("$argon2id$v=19$stub".to_string()),
            profile_picture: String::new(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(account.view()).expect("view serializes");
        assert_eq!(json["role"], "recruiter");
        assert_eq!(json["company"], "Acme");
        assert!(json.get("password_hash").is_none());
        assert!(!format!("{account:?}").contains("argon2id"));
    }
}
