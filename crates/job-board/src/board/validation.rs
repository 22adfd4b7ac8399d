use std::sync::OnceLock;

use regex::Regex;

use super::domain::{AccountKind, ApplicantProfile, JobDraft, ProfileUpdate, Registration, Role};

/// Field-level rejection raised before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("'{value}' is not a valid email address")]
    MalformedEmail { value: String },
    #[error("phone number must be exactly 10 digits")]
    InvalidPhoneNumber,
    #[error("years of experience must be positive")]
    NonPositiveExperience,
    #[error("expected salary must be positive")]
    NonPositiveSalary,
    #[error("at least one skill is required")]
    EmptySkills,
    #[error("skills must not contain blank entries")]
    BlankSkill,
    #[error("recruiter accounts require a company")]
    MissingCompany,
    #[error("{role} accounts cannot carry a company")]
    UnexpectedCompany { role: Role },
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"))
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::BlankField { field })
    } else {
        Ok(())
    }
}

pub(crate) fn validate_email(value: &str) -> Result<(), ValidationError> {
    if email_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedEmail {
            value: value.to_string(),
        })
    }
}

pub(crate) fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if phone_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhoneNumber)
    }
}

/// Resolves the role-dependent company field into a closed account variant.
pub fn account_kind(role: Role, company: Option<&str>) -> Result<AccountKind, ValidationError> {
    let company = company.map(str::trim).filter(|value| !value.is_empty());
    match (role, company) {
        (Role::Recruiter, Some(company)) => Ok(AccountKind::Recruiter {
            company: company.to_string(),
        }),
        (Role::Recruiter, None) => Err(ValidationError::MissingCompany),
        (Role::Seeker, None) => Ok(AccountKind::Seeker),
        (Role::Admin, None) => Ok(AccountKind::Admin),
        (role, Some(_)) => Err(ValidationError::UnexpectedCompany { role }),
    }
}

pub(crate) fn validate_registration(
    registration: &Registration,
) -> Result<AccountKind, ValidationError> {
    validate_email(registration.email.trim())?;
    require_text("username", &registration.username)?;
    require_text("first_name", &registration.first_name)?;
    require_text("last_name", &registration.last_name)?;
    require_text("password", &registration.password)?;
    if let Some(phone) = registration
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
    {
        validate_phone(phone)?;
    }
    account_kind(registration.role, registration.company.as_deref())
}

pub(crate) fn validate_profile_update(
    update: &ProfileUpdate,
    current: &AccountKind,
) -> Result<(), ValidationError> {
    if let Some(email) = &update.email {
        validate_email(email.trim())?;
    }
    if let Some(username) = &update.username {
        require_text("username", username)?;
    }
    if let Some(first_name) = &update.first_name {
        require_text("first_name", first_name)?;
    }
    if let Some(last_name) = &update.last_name {
        require_text("last_name", last_name)?;
    }
    if let Some(phone) = &update.phone {
        validate_phone(phone.trim())?;
    }
    if let Some(password) = &update.password {
        require_text("password", password)?;
    }
    if let Some(company) = &update.company {
        account_kind(current.role(), Some(company))?;
    }
    Ok(())
}

pub(crate) fn validate_job_draft(draft: &JobDraft) -> Result<(), ValidationError> {
    require_text("title", &draft.title)?;
    require_text("description", &draft.description)?;
    require_text("job_role", &draft.job_role)?;
    if let Some(company) = &draft.company {
        require_text("company", company)?;
    }
    Ok(())
}

/// Checks every applicant field; the first failure wins.
pub fn validate_applicant(profile: &ApplicantProfile) -> Result<(), ValidationError> {
    require_text("first_name", &profile.first_name)?;
    require_text("last_name", &profile.last_name)?;
    validate_email(&profile.email)?;
    validate_phone(&profile.phone_number)?;

    if profile.years_of_experience <= 0 {
        return Err(ValidationError::NonPositiveExperience);
    }
    if !profile.expected_salary.is_finite() || profile.expected_salary <= 0.0 {
        return Err(ValidationError::NonPositiveSalary);
    }
    if profile.skills.is_empty() {
        return Err(ValidationError::EmptySkills);
    }
    if profile.skills.iter().any(|skill| skill.trim().is_empty()) {
        return Err(ValidationError::BlankSkill);
    }

    require_text("description", &profile.description)
}
