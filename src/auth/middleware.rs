//! Request pipeline stages: token extraction, the auth gate, and request
//! logging. Each stage either enriches the request or short-circuits with a
//! response via [`Error`].

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, info};

/// Candidate bearer token pulled from the `Authorization` header.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

const BEARER_PREFIX: &str = "bearer ";

/// Runs on every request. Stores the token as a request extension when the
/// header is present and `Bearer `-prefixed (case-insensitively); otherwise
/// leaves it unset. Never fails.
pub async fn mw_token_extractor(mut req: Request, next: Next) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Some(value) = header_value {
        if value.len() >= BEARER_PREFIX.len()
            && value[..BEARER_PREFIX.len()].eq_ignore_ascii_case(BEARER_PREFIX)
        {
            let token = value[BEARER_PREFIX.len()..].to_string();
            req.extensions_mut().insert(BearerToken(token));
        }
    }

    next.run(req).await
}

/// Applied only to protected routes. Verifies the extracted token and
/// attaches the decoded identity as [`Ctx`] for downstream handlers.
pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = req
        .extensions()
        .get::<BearerToken>()
        .cloned()
        .ok_or(Error::AuthFailNoToken)?;

    let claims = crate::auth::verify_token(&token.0, &state.config.secret)
        .map_err(|_| Error::AuthFailTokenInvalid)?;

    if claims.id.is_empty() {
        return Err(Error::AuthFailTokenInvalid);
    }

    req.extensions_mut().insert(Ctx::new(claims.id, claims.username));

    Ok(next.run(req).await)
}

/// Logs method and path for every request.
pub async fn mw_request_log(req: Request, next: Next) -> Response {
    info!("{} {}", req.method(), req.uri().path());
    next.run(req).await
}
