//! Router assembly.
//!
//! Pipeline order for every request: trace -> cors -> token extractor ->
//! request log -> route dispatch. Protected blog routes additionally pass
//! through the auth gate, which may short-circuit with a 401.

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::middleware::{mw_request_log, mw_require_auth, mw_token_extractor};
use crate::config::AppState;
use crate::handlers::{blogs, comments, login, testing, users};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/blogs", post(blogs::create_blog))
        .route(
            "/api/blogs/{id}",
            put(blogs::update_blog).delete(blogs::delete_blog),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    let mut app = Router::new()
        .route("/api/blogs", get(blogs::list_blogs))
        .route("/api/blogs/{id}", get(blogs::get_blog))
        .route("/api/blogs/{id}/comments", post(comments::create_comment))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/login", post(login::login))
        .merge(protected);

    if state.config.test_mode {
        app = app.route("/api/testing/reset", post(testing::reset));
    }

    app.fallback(unknown_endpoint)
        .layer(middleware::from_fn(mw_request_log))
        .layer(middleware::from_fn(mw_token_extractor))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Catch-all for unknown routes.
async fn unknown_endpoint() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "unknown endpoint" })),
    )
}
