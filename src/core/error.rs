use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

#[derive(Debug)]
pub enum Error {
    // Auth Errors
    LoginFail,
    AuthFailNoToken,
    AuthFailTokenInvalid,
    AuthFailCtxNotInRequestExt,
    /// Authenticated identity does not own the resource it tried to mutate.
    NotOwner,

    // Request Errors
    Validation(String),
    InvalidId,
    BlogNotFound,
    UserNotFound,

    // Generic
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::LoginFail => (
                StatusCode::UNAUTHORIZED,
                "invalid username or password".to_string(),
            ),
            Error::AuthFailNoToken | Error::AuthFailTokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "token missing or invalid".to_string(),
            ),
            Error::AuthFailCtxNotInRequestExt => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth context missing".to_string(),
            ),
            Error::NotOwner => (StatusCode::UNAUTHORIZED, "invalid user".to_string()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::InvalidId => (StatusCode::BAD_REQUEST, "invalid id provided".to_string()),
            Error::BlogNotFound => (StatusCode::NOT_FOUND, "blog not found".to_string()),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "user not found".to_string()),
            Error::Internal(msg) => {
                warn!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}
