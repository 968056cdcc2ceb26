//! Login handler: password check against the stored hash, then a signed
//! token. The failure message never reveals whether the username or the
//! password was wrong.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{self, Claims};
use crate::config::AppState;
use crate::core::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .store
        .find_user_by_username(&req.username)
        .await
        .ok_or_else(|| {
            warn!("login attempt for unknown user {}", req.username);
            Error::LoginFail
        })?;

    let correct = auth::verify_password(&req.password, &user.password_hash)?;
    if !correct {
        warn!("failed login attempt for {}", user.username);
        return Err(Error::LoginFail);
    }

    let claims = Claims {
        username: user.username.clone(),
        id: user.id.clone(),
    };
    let token = auth::sign_token(&claims, &state.config.secret)?;

    info!("user {} logged in", user.username);

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
