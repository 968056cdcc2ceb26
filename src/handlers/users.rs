//! User handlers.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth;
use crate::config::AppState;
use crate::core::error::{Error, Result};
use crate::models::UserResponse;

const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.store.list_users().await;

    let mut expanded = Vec::with_capacity(users.len());
    for user in &users {
        expanded.push(state.store.user_response(user).await);
    }

    Ok(Json(expanded))
}

/// POST /api/users. Password length is checked here; username length and
/// uniqueness are enforced by the store. The response never carries the
/// password hash.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserRequest>,
) -> Result<Json<UserResponse>> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = state
        .store
        .add_user(req.username, req.name, password_hash)
        .await?;

    Ok(Json(state.store.user_response(&user).await))
}
