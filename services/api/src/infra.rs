use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use job_board::board::{InMemoryBoardStore, JobBoardService, PasswordHasher, TokenService};
use job_board::config::AuthConfig;
use job_board::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;

pub(crate) type Board = JobBoardService<InMemoryBoardStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the board over a fresh in-memory store and seeds the configured
/// administrator, if any.
pub(crate) fn build_board(auth: &AuthConfig, hasher: PasswordHasher) -> Result<Arc<Board>, AppError> {
    let store = Arc::new(InMemoryBoardStore::new());
    let tokens = TokenService::new(auth.jwt_secret.clone(), auth.token_ttl_hours);
    let board = Arc::new(JobBoardService::new(store, hasher, tokens));

    if let Some(seed) = &auth.admin_seed {
        match board
            .accounts()
            .seed_admin(&seed.email, &seed.username, &seed.password)?
        {
            Some(admin) => tracing::info!(account_id = %admin.id, "administrator seeded"),
            None => tracing::info!("administrator already present, seed skipped"),
        }
    }

    Ok(board)
}
