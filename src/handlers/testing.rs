//! Test-mode support route. Mounted only when the server runs with
//! `APP_ENV=test`, so end-to-end test suites can reset state between runs.

use axum::{extract::State, http::StatusCode};
use tracing::info;

use crate::config::AppState;
use crate::core::error::Result;

/// POST /api/testing/reset
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode> {
    state.store.clear_all().await?;
    info!("store reset");
    Ok(StatusCode::NO_CONTENT)
}
