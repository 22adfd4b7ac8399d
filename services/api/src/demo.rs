use crate::infra::Board;
use clap::Args;
use job_board::board::{
    ApplicantProfile, ApplicationStatus, ApplicationSubmission, BoardError, IdentityContext,
    InMemoryBoardStore, JobBoardService, JobDraft, PasswordHasher, Registration, Role,
    TokenService,
};
use job_board::error::AppError;
use std::sync::Arc;

const DEMO_PASSWORD: &str = "demo-password";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Company the demo recruiter hires for
    #[arg(long, default_value = "Acme")]
    pub(crate) company: String,
    /// Title of the posted job
    #[arg(long, default_value = "Backend Engineer")]
    pub(crate) title: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    hiring_round(args, PasswordHasher::new())
}

fn hiring_round(args: DemoArgs, hasher: PasswordHasher) -> Result<(), AppError> {
    let DemoArgs { company, title } = args;

    println!("Job board hiring round demo");
    let board = demo_board(hasher);
    let anonymous = IdentityContext::Anonymous;

    let recruiter = board.accounts().register(
        &anonymous,
        demo_registration("rita", Role::Recruiter, Some(&company)),
    )?;
    let seeker = board
        .accounts()
        .register(&anonymous, demo_registration("sam", Role::Seeker, None))?;
    println!(
        "- Registered recruiter {} ({}) and seeker {}",
        recruiter.username,
        recruiter.kind.company().unwrap_or_default(),
        seeker.username
    );

    let recruiter_caller = sign_in(&board, &recruiter.email)?;
    let seeker_caller = sign_in(&board, &seeker.email)?;
    println!("- Both accounts signed in with bearer tokens");

    let job = board.jobs().post(
        &recruiter_caller,
        JobDraft {
            title,
            description: "Design and operate the hiring platform APIs.".to_string(),
            job_role: "Engineering".to_string(),
            company: None,
            posted_by: recruiter.id.clone(),
        },
    )?;
    println!("- Posted job {} \"{}\" at {}", job.id, job.title, job.company);

    let application = board.applications().submit(
        &seeker_caller,
        &job.id,
        ApplicationSubmission {
            applied_by: seeker.id.clone(),
            profile: demo_profile(),
        },
    )?;
    println!(
        "- Seeker applied: application {} -> {}",
        application.id, application.status
    );

    let decided = board.applications().decide(
        &recruiter_caller,
        &application.id,
        ApplicationStatus::Shortlisted,
    )?;
    println!("- Recruiter decided: {}", decided.status);

    match board.applications().decide(
        &recruiter_caller,
        &application.id,
        ApplicationStatus::Rejected,
    ) {
        Err(err @ BoardError::InvalidTransition { .. }) => {
            println!("- Second decision refused: {err}");
        }
        Err(err) => return Err(err.into()),
        Ok(unexpected) => {
            println!("- Second decision unexpectedly applied: {}", unexpected.status);
        }
    }

    let listing = board
        .applications()
        .list_by_recruiter(&recruiter_caller, &recruiter.id)?;
    match serde_json::to_string_pretty(&listing) {
        Ok(json) => println!("  Recruiter view:\n{json}"),
        Err(err) => println!("  Recruiter view unavailable: {err}"),
    }

    let deleted = board.jobs().delete(&recruiter_caller, &job.id)?;
    println!(
        "- Deleted job {} together with {} application(s)",
        deleted.job.id,
        deleted.removed_applications.len()
    );

    match board.applications().get(&seeker_caller, &application.id) {
        Err(err @ BoardError::NotFound { .. }) => println!("- Lookup after delete: {err}"),
        Err(err) => return Err(err.into()),
        Ok(_) => println!("- Application unexpectedly survived the delete"),
    }

    Ok(())
}

fn demo_board(hasher: PasswordHasher) -> Arc<Board> {
    Arc::new(JobBoardService::new(
        Arc::new(InMemoryBoardStore::new()),
        hasher,
        TokenService::new("demo-only-secret", 1),
    ))
}

fn sign_in(board: &Board, email: &str) -> Result<IdentityContext, AppError> {
    let token = board.auth().issue_token(email, DEMO_PASSWORD)?;
    Ok(board.auth().verify_token(Some(&token)))
}

fn demo_registration(handle: &str, role: Role, company: Option<&str>) -> Registration {
    Registration {
        email: format!("{handle}@demo.test"),
        username: handle.to_string(),
        first_name: handle.to_string(),
        last_name: "Demo".to_string(),
        phone: None,
        password: DEMO_PASSWORD.to_string(),
        role,
        company: company.map(str::to_string),
    }
}

fn demo_profile() -> ApplicantProfile {
    ApplicantProfile {
        first_name: "Sam".to_string(),
        last_name: "Demo".to_string(),
        email: "sam@demo.test".to_string(),
        phone_number: "5551234567".to_string(),
        years_of_experience: 5,
        skills: vec!["rust".to_string(), "postgres".to_string(), "axum".to_string()],
        current_job_title: Some("Software Engineer".to_string()),
        expected_salary: 125_000.0,
        description: "Five years building reliable backend services.".to_string(),
    }
}
