use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::auth::IdentityContext;
use super::domain::{
    AccountId, ApplicationId, ApplicationStatus, ApplicationSubmission, JobDraft, JobId,
    ProfileUpdate, Registration, Role,
};
use super::error::{BoardError, Denial};
use super::repository::BoardStore;
use super::service::JobBoardService;
use crate::config::BoundaryConfig;

/// Room for the JSON envelope around an uploaded picture.
const ENVELOPE_ALLOWANCE: usize = 64 * 1024;

pub struct BoardState<R> {
    service: Arc<JobBoardService<R>>,
    boundary: BoundaryConfig,
}

impl<R> Clone for BoardState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            boundary: self.boundary.clone(),
        }
    }
}

/// Router builder exposing the board over HTTP/JSON.
pub fn board_router<R>(service: Arc<JobBoardService<R>>, boundary: BoundaryConfig) -> Router
where
    R: BoardStore + 'static,
{
    let body_limit = boundary.max_upload_bytes.saturating_add(ENVELOPE_ALLOWANCE);
    let state = BoardState { service, boundary };

    Router::new()
        .route("/api/v1/auth/token", post(issue_token_handler::<R>))
        .route(
            "/api/v1/accounts",
            post(register_handler::<R>).get(list_accounts_handler::<R>),
        )
        .route(
            "/api/v1/accounts/:account_id",
            get(get_account_handler::<R>).patch(update_profile_handler::<R>),
        )
        .route(
            "/api/v1/accounts/:account_id/toggle-active",
            post(toggle_active_handler::<R>),
        )
        .route(
            "/api/v1/accounts/:account_id/picture",
            put(set_picture_handler::<R>).delete(clear_picture_handler::<R>),
        )
        .route(
            "/api/v1/accounts/:account_id/applications",
            get(applicant_applications_handler::<R>),
        )
        .route(
            "/api/v1/recruiters/:account_id/applications",
            get(recruiter_applications_handler::<R>),
        )
        .route(
            "/api/v1/jobs",
            get(list_jobs_handler::<R>).post(post_job_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job_handler::<R>).delete(delete_job_handler::<R>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(submit_handler::<R>),
        )
        .route("/api/v1/applications", get(list_applications_handler::<R>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decide_handler::<R>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::NotFound { .. } => StatusCode::NOT_FOUND,
            BoardError::DuplicateField { .. } | BoardError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            BoardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BoardError::InvalidCredentials | BoardError::Unauthorized(Denial::Anonymous) => {
                StatusCode::UNAUTHORIZED
            }
            BoardError::Unauthorized(_) => StatusCode::FORBIDDEN,
            BoardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "board operation failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Resolves the `Authorization` header, with or without the `Bearer ` prefix.
pub(crate) fn caller_identity<R>(
    service: &JobBoardService<R>,
    headers: &HeaderMap,
) -> IdentityContext
where
    R: BoardStore + 'static,
{
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value));
    service.auth().verify_token(token)
}

#[derive(Debug, Deserialize)]
pub(crate) struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountFilter {
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobFilter {
    #[serde(default)]
    posted_by: Option<AccountId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PictureUpload {
    profile_picture: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    status: ApplicationStatus,
}

pub(crate) async fn issue_token_handler<R>(
    State(state): State<BoardState<R>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, BoardError>
where
    R: BoardStore + 'static,
{
    let token = state
        .service
        .auth()
        .issue_token(&credentials.email, &credentials.password)?;
    Ok(Json(TokenResponse { token }))
}

pub(crate) async fn register_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Json(registration): Json<Registration>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let account = state.service.accounts().register(&caller, registration)?;
    Ok((StatusCode::CREATED, Json(account)).into_response())
}

pub(crate) async fn list_accounts_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Query(filter): Query<AccountFilter>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let accounts = state.service.accounts().list(&caller, filter.role)?;
    Ok(Json(accounts).into_response())
}

pub(crate) async fn get_account_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let account = state
        .service
        .accounts()
        .get(&caller, &AccountId(account_id))?;
    Ok(Json(account).into_response())
}

pub(crate) async fn update_profile_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let account = state
        .service
        .accounts()
        .update_profile(&caller, &AccountId(account_id), update)?;
    Ok(Json(account).into_response())
}

pub(crate) async fn toggle_active_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let account = state
        .service
        .accounts()
        .toggle_active(&caller, &AccountId(account_id))?;
    Ok(Json(account).into_response())
}

pub(crate) async fn set_picture_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
    Json(upload): Json<PictureUpload>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let limit = state.boundary.max_upload_bytes;
    if upload.profile_picture.len() > limit {
        let payload = json!({
            "error": format!("profile picture exceeds {limit} bytes"),
        });
        return Ok((StatusCode::PAYLOAD_TOO_LARGE, Json(payload)).into_response());
    }

    let caller = caller_identity(&state.service, &headers);
    let account = state.service.accounts().set_profile_picture(
        &caller,
        &AccountId(account_id),
        upload.profile_picture,
    )?;
    Ok(Json(account).into_response())
}

pub(crate) async fn clear_picture_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let account = state
        .service
        .accounts()
        .clear_profile_picture(&caller, &AccountId(account_id))?;
    Ok(Json(account).into_response())
}

pub(crate) async fn applicant_applications_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let views = state
        .service
        .applications()
        .list_by_applicant(&caller, &AccountId(account_id))?;
    Ok(Json(views).into_response())
}

pub(crate) async fn recruiter_applications_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let views = state
        .service
        .applications()
        .list_by_recruiter(&caller, &AccountId(account_id))?;
    Ok(Json(views).into_response())
}

pub(crate) async fn list_jobs_handler<R>(
    State(state): State<BoardState<R>>,
    Query(filter): Query<JobFilter>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let jobs = match filter.posted_by {
        Some(owner) => state.service.jobs().list_by_owner(&owner)?,
        None => state.service.jobs().list_all()?,
    };
    Ok(Json(jobs).into_response())
}

pub(crate) async fn post_job_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let job = state.service.jobs().post(&caller, draft)?;
    Ok((StatusCode::CREATED, Json(job)).into_response())
}

pub(crate) async fn get_job_handler<R>(
    State(state): State<BoardState<R>>,
    Path(job_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let job = state.service.jobs().get(&JobId(job_id))?;
    Ok(Json(job).into_response())
}

pub(crate) async fn delete_job_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let deleted = state.service.jobs().delete(&caller, &JobId(job_id))?;
    Ok(Json(deleted).into_response())
}

pub(crate) async fn submit_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let application = state
        .service
        .applications()
        .submit(&caller, &JobId(job_id), submission)?;
    Ok((StatusCode::CREATED, Json(application)).into_response())
}

pub(crate) async fn list_applications_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let views = state.service.applications().list_all(&caller)?;
    Ok(Json(views).into_response())
}

pub(crate) async fn get_application_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let application = state
        .service
        .applications()
        .get(&caller, &ApplicationId(application_id))?;
    Ok(Json(application).into_response())
}

pub(crate) async fn decide_handler<R>(
    State(state): State<BoardState<R>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Result<Response, BoardError>
where
    R: BoardStore + 'static,
{
    let caller = caller_identity(&state.service, &headers);
    let application = state.service.applications().decide(
        &caller,
        &ApplicationId(application_id),
        request.status,
    )?;
    Ok(Json(application).into_response())
}
