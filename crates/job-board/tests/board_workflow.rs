//! End-to-end hiring flow driven through the public service facade and the
//! HTTP router, without reaching into private modules.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use job_board::board::{
    board_router, ApplicantProfile, ApplicationStatus, ApplicationSubmission, BoardError,
    IdentityContext, InMemoryBoardStore, JobBoardService, JobDraft, PasswordHasher,
    Registration, Role, TokenService,
};
use job_board::config::BoundaryConfig;

const PASSWORD: &str = "hunter2-but-longer";

fn service() -> Arc<JobBoardService<InMemoryBoardStore>> {
    Arc::new(JobBoardService::new(
        Arc::new(InMemoryBoardStore::new()),
        PasswordHasher::with_params(1024, 1, 1),
        TokenService::new("integration-secret", 1),
    ))
}

fn registration(handle: &str, role: Role, company: Option<&str>) -> Registration {
    Registration {
        email: format!("{handle}@example.test"),
        username: handle.to_string(),
        first_name: handle.to_string(),
        last_name: "Example".to_string(),
        phone: None,
        password: PASSWORD.to_string(),
        role,
        company: company.map(str::to_string),
    }
}

fn profile() -> ApplicantProfile {
    ApplicantProfile {
        first_name: "Sam".to_string(),
        last_name: "Example".to_string(),
        email: "sam@example.test".to_string(),
        phone_number: "5551234567".to_string(),
        years_of_experience: 4,
        skills: vec!["rust".to_string(), "postgres".to_string()],
        current_job_title: None,
        expected_salary: 120_000.0,
        description: "I build reliable backends.".to_string(),
    }
}

fn login(service: &JobBoardService<InMemoryBoardStore>, email: &str) -> IdentityContext {
    let token = service
        .auth()
        .issue_token(email, PASSWORD)
        .expect("credentials accepted");
    service.auth().verify_token(Some(&token))
}

#[test]
fn recruiter_and_seeker_complete_a_hiring_round() {
    let service = service();
    let anonymous = IdentityContext::Anonymous;

    let recruiter = service
        .accounts()
        .register(&anonymous, registration("rita", Role::Recruiter, Some("Acme")))
        .expect("recruiter registers");
    let seeker = service
        .accounts()
        .register(&anonymous, registration("sam", Role::Seeker, None))
        .expect("seeker registers");

    let recruiter_caller = login(&service, "rita@example.test");
    let seeker_caller = login(&service, "sam@example.test");

    let job = service
        .jobs()
        .post(
            &recruiter_caller,
            JobDraft {
                title: "Backend Engineer".to_string(),
                description: "Own the hiring platform APIs.".to_string(),
                job_role: "Engineering".to_string(),
                company: Some("Acme".to_string()),
                posted_by: recruiter.id.clone(),
            },
        )
        .expect("recruiter posts");

    let application = service
        .applications()
        .submit(
            &seeker_caller,
            &job.id,
            ApplicationSubmission {
                applied_by: seeker.id.clone(),
                profile: profile(),
            },
        )
        .expect("seeker applies");
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.company_name, "Acme");

    let shortlisted = service
        .applications()
        .decide(&recruiter_caller, &application.id, ApplicationStatus::Shortlisted)
        .expect("recruiter shortlists");
    assert_eq!(shortlisted.status, ApplicationStatus::Shortlisted);

    match service
        .applications()
        .decide(&recruiter_caller, &application.id, ApplicationStatus::Rejected)
    {
        Err(BoardError::InvalidTransition { .. }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }

    let deleted = service
        .jobs()
        .delete(&recruiter_caller, &job.id)
        .expect("recruiter deletes");
    assert_eq!(deleted.removed_applications, vec![application.id.clone()]);

    match service.applications().get(&seeker_caller, &application.id) {
        Err(BoardError::NotFound { .. }) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(service
        .applications()
        .list_by_applicant(&seeker_caller, &seeker.id)
        .expect("seeker lists")
        .is_empty());
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json payload")
    };
    (status, payload)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn without_body(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn hiring_round_over_http() {
    let router = board_router(service(), BoundaryConfig::default());

    let (status, recruiter) = send(
        &router,
        post_json(
            "/api/v1/accounts",
            None,
            json!({
                "email": "rita@example.test",
                "username": "rita",
                "first_name": "Rita",
                "last_name": "Example",
                "password": PASSWORD,
                "role": "recruiter",
                "company": "Acme"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, seeker) = send(
        &router,
        post_json(
            "/api/v1/accounts",
            None,
            json!({
                "email": "sam@example.test",
                "username": "sam",
                "first_name": "Sam",
                "last_name": "Example",
                "password": PASSWORD,
                "role": "seeker"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, recruiter_token) = send(
        &router,
        post_json(
            "/api/v1/auth/token",
            None,
            json!({ "email": "rita@example.test", "password": PASSWORD }),
        ),
    )
    .await;
    let recruiter_token = recruiter_token["token"].as_str().expect("token").to_string();
    let (_, seeker_token) = send(
        &router,
        post_json(
            "/api/v1/auth/token",
            None,
            json!({ "email": "sam@example.test", "password": PASSWORD }),
        ),
    )
    .await;
    let seeker_token = seeker_token["token"].as_str().expect("token").to_string();

    let (status, job) = send(
        &router,
        post_json(
            "/api/v1/jobs",
            Some(&recruiter_token),
            json!({
                "title": "Backend Engineer",
                "description": "Own the hiring platform APIs.",
                "job_role": "Engineering",
                "posted_by": recruiter["id"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["company"], "Acme");
    let job_id = job["id"].as_str().expect("job id").to_string();

    let mut submission = serde_json::to_value(profile()).expect("serializable");
    submission["applied_by"] = seeker["id"].clone();
    let (status, application) = send(
        &router,
        post_json(
            &format!("/api/v1/jobs/{job_id}/applications"),
            Some(&seeker_token),
            submission,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    let application_id = application["id"].as_str().expect("id").to_string();

    let (status, listed) = send(
        &router,
        without_body(
            Method::GET,
            &format!(
                "/api/v1/recruiters/{}/applications",
                recruiter["id"].as_str().expect("id")
            ),
            &recruiter_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["application"]["id"], application_id.as_str());
    assert_eq!(listed[0]["applicant"]["email"], "sam@example.test");

    let decision_uri = format!("/api/v1/applications/{application_id}/decision");
    let (status, decided) = send(
        &router,
        post_json(
            &decision_uri,
            Some(&recruiter_token),
            json!({ "status": "shortlisted" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["status"], "shortlisted");

    let (status, _) = send(
        &router,
        post_json(
            &decision_uri,
            Some(&recruiter_token),
            json!({ "status": "rejected" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, deleted) = send(
        &router,
        without_body(
            Method::DELETE,
            &format!("/api/v1/jobs/{job_id}"),
            &recruiter_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed_applications"][0], application_id.as_str());

    let (status, _) = send(
        &router,
        without_body(
            Method::GET,
            &format!("/api/v1/applications/{application_id}"),
            &seeker_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
