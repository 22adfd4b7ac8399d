use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::board::domain::Role;

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
        .expect("request builds")
}

fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

async fn login(router: &axum::Router, email: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/token",
            None,
            json!({ "email": email, "password": PASSWORD }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    payload["token"]
        .as_str()
        .expect("token issued")
        .to_string()
}

#[tokio::test]
async fn registration_then_login_round_trip() {
    let (service, _) = build_service();
    let router = router_for(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/accounts",
            None,
            json!({
                "email": "rita@board.test",
                "username": "rita",
                "first_name": "Rita",
                "last_name": "Ramos",
                "password": PASSWORD,
                "role": "recruiter",
                "company": "Acme"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let account = read_json_body(response).await;
    assert_eq!(account["role"], "recruiter");
    assert_eq!(account["company"], "Acme");
    assert!(account.get("password_hash").is_none());

    let token = login(&router, "rita@board.test").await;
    let account_id = account["id"].as_str().expect("id");
    let response = router
        .clone()
        .oneshot(bare_request(
            Method::GET,
            &format!("/api/v1/accounts/{account_id}"),
            Some(&token),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let (service, _) = build_service();
    register(&service, "nia", Role::Seeker);
    let router = router_for(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/token",
            None,
            json!({ "email": "nia@board.test", "password": "nope" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutations_without_token_are_unauthorized() {
    let (service, _) = build_service();
    let (recruiter, _) = register(&service, "ravi", Role::Recruiter);
    let router = router_for(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/jobs",
            None,
            json!({
                "title": "Engineer",
                "description": "Build things",
                "job_role": "Engineering",
                "posted_by": recruiter.id
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let (service, _) = build_service();
    let (seeker, _) = register(&service, "suri", Role::Seeker);
    let router = router_for(service);
    let token = login(&router, "suri@board.test").await;

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/jobs",
            Some(&token),
            json!({
                "title": "Engineer",
                "description": "Build things",
                "job_role": "Engineering",
                "posted_by": seeker.id
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let (service, _) = build_service();
    let router = router_for(service);

    let response = router
        .oneshot(bare_request(Method::GET, "/api/v1/jobs/does-not-exist", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("does-not-exist"));
}

#[tokio::test]
async fn invalid_application_is_unprocessable() {
    let (service, _) = build_service();
    let (recruiter, recruiter_caller) = register(&service, "rosa", Role::Recruiter);
    let (seeker, _) = register(&service, "sara", Role::Seeker);
    let job = post_job(&service, &recruiter, &recruiter_caller, "Engineer");
    let router = router_for(service);
    let token = login(&router, "sara@board.test").await;

    let mut payload = serde_json::to_value(submission(&seeker)).expect("serializable");
    payload["phone_number"] = json!("12345");

    let response = router
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/jobs/{}/applications", job.id),
            Some(&token),
            payload,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn second_decision_conflicts() {
    let (service, _) = build_service();
    let (recruiter, recruiter_caller) = register(&service, "reza", Role::Recruiter);
    let (seeker, seeker_caller) = register(&service, "sami", Role::Seeker);
    let job = post_job(&service, &recruiter, &recruiter_caller, "Engineer");
    let application = apply(&service, &seeker, &seeker_caller, &job);
    let router = router_for(service);
    let token = login(&router, "reza@board.test").await;
    let uri = format!("/api/v1/applications/{}/decision", application.id);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &uri,
            Some(&token),
            json!({ "status": "shortlisted" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "shortlisted");
    assert_eq!(payload["decision"]["decided_by"], recruiter.id.as_str());

    let response = router
        .oneshot(json_request(
            Method::POST,
            &uri,
            Some(&token),
            json!({ "status": "rejected" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn oversized_picture_is_rejected() {
    let (service, _) = build_service();
    let (seeker, _) = register(&service, "tali", Role::Seeker);
    let router = router_with_limit(service, 16);
    let token = login(&router, "tali@board.test").await;
    let uri = format!("/api/v1/accounts/{}/picture", seeker.id);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &uri,
            Some(&token),
            json!({ "profile_picture": "x".repeat(64) }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = router
        .oneshot(json_request(
            Method::PUT,
            &uri,
            Some(&token),
            json!({ "profile_picture": "small" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["profile_picture"], "small");
}

#[tokio::test]
async fn job_listing_filters_by_owner() {
    let (service, _) = build_service();
    let (first, first_caller) = register(&service, "rafe", Role::Recruiter);
    let (second, second_caller) = register(&service, "roma", Role::Recruiter);
    post_job(&service, &first, &first_caller, "One");
    post_job(&service, &second, &second_caller, "Two");
    let router = router_for(service);

    let response = router
        .clone()
        .oneshot(bare_request(Method::GET, "/api/v1/jobs", None))
        .await
        .expect("route executes");
    let all = read_json_body(response).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let response = router
        .oneshot(bare_request(
            Method::GET,
            &format!("/api/v1/jobs?posted_by={}", first.id),
            None,
        ))
        .await
        .expect("route executes");
    let owned = read_json_body(response).await;
    let owned = owned.as_array().expect("array");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0]["posted_by"], first.id.as_str());
}
