use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::board::auth::{IdentityContext, PasswordHasher, TokenService};
use crate::board::domain::{
    AccountView, ApplicantProfile, Application, ApplicationSubmission, JobDraft, JobPosting,
    Registration, Role,
};
use crate::board::memory::InMemoryBoardStore;
use crate::board::service::JobBoardService;
use crate::board::{board_router, Identity};
use crate::config::BoundaryConfig;

pub(super) const PASSWORD: &str = "s3cret-pass";
pub(super) const TOKEN_SECRET: &str = "board-test-secret";

pub(super) fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1)
}

pub(super) fn build_service() -> (Arc<JobBoardService<InMemoryBoardStore>>, Arc<InMemoryBoardStore>)
{
    let store = Arc::new(InMemoryBoardStore::new());
    let service = JobBoardService::new(
        store.clone(),
        cheap_hasher(),
        TokenService::new(TOKEN_SECRET, 24),
    );
    (Arc::new(service), store)
}

pub(super) fn registration(handle: &str, role: Role) -> Registration {
    Registration {
        email: format!("{handle}@board.test"),
        username: handle.to_string(),
        first_name: "Test".to_string(),
        last_name: handle.to_string(),
        phone: None,
        password: PASSWORD.to_string(),
        role,
        company: match role {
            Role::Recruiter => Some(format!("{handle} Corp")),
            Role::Seeker | Role::Admin => None,
        },
    }
}

pub(super) fn context_for(account: &AccountView) -> IdentityContext {
    IdentityContext::Authenticated(Identity {
        subject: account.id.clone(),
        role: account.kind.role(),
    })
}

pub(super) fn register(
    service: &JobBoardService<InMemoryBoardStore>,
    handle: &str,
    role: Role,
) -> (AccountView, IdentityContext) {
    let account = service
        .accounts()
        .register(&IdentityContext::Anonymous, registration(handle, role))
        .expect("registration succeeds");
    let caller = context_for(&account);
    (account, caller)
}

pub(super) fn seed_admin(
    service: &JobBoardService<InMemoryBoardStore>,
) -> (AccountView, IdentityContext) {
    let admin = service
        .accounts()
        .seed_admin("root@board.test", "root", PASSWORD)
        .expect("seeding succeeds")
        .expect("administrator created");
    let caller = context_for(&admin);
    (admin, caller)
}

pub(super) fn draft(recruiter: &AccountView, title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: "Build and run the platform.".to_string(),
        job_role: "Engineering".to_string(),
        company: None,
        posted_by: recruiter.id.clone(),
    }
}

pub(super) fn post_job(
    service: &JobBoardService<InMemoryBoardStore>,
    recruiter: &AccountView,
    caller: &IdentityContext,
    title: &str,
) -> JobPosting {
    service
        .jobs()
        .post(caller, draft(recruiter, title))
        .expect("job posts")
}

pub(super) fn applicant_profile() -> ApplicantProfile {
    ApplicantProfile {
        first_name: "Sam".to_string(),
        last_name: "Seeker".to_string(),
        email: "sam@mail.test".to_string(),
        phone_number: "5551234567".to_string(),
        years_of_experience: 3,
        skills: vec!["rust".to_string(), " sql ".to_string()],
        current_job_title: Some("Developer".to_string()),
        expected_salary: 95_000.0,
        description: "Keen to join the team.".to_string(),
    }
}

pub(super) fn submission(seeker: &AccountView) -> ApplicationSubmission {
    ApplicationSubmission {
        applied_by: seeker.id.clone(),
        profile: applicant_profile(),
    }
}

pub(super) fn apply(
    service: &JobBoardService<InMemoryBoardStore>,
    seeker: &AccountView,
    caller: &IdentityContext,
    job: &JobPosting,
) -> Application {
    service
        .applications()
        .submit(caller, &job.id, submission(seeker))
        .expect("application submits")
}

pub(super) fn router_for(service: Arc<JobBoardService<InMemoryBoardStore>>) -> axum::Router {
    router_with_limit(service, BoundaryConfig::default().max_upload_bytes)
}

pub(super) fn router_with_limit(
    service: Arc<JobBoardService<InMemoryBoardStore>>,
    max_upload_bytes: usize,
) -> axum::Router {
    board_router(service, BoundaryConfig { max_upload_bytes })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
