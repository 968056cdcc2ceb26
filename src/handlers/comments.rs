//! Comment handlers, nested under a blog id. Comments are unauthenticated
//! and immutable once created.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::config::AppState;
use crate::core::error::{Error, Result};
use crate::models::CommentResponse;

use super::validate_id;

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub content: String,
}

/// POST /api/blogs/{id}/comments. The comment id is appended to the parent
/// blog's comment list; the response expands the blog to `{title, author}`.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let blog_id = validate_id(&id)?;

    if state.store.find_blog(blog_id).await.is_none() {
        return Err(Error::BlogNotFound);
    }

    let comment = state.store.add_comment(req.content, blog_id).await?;
    state
        .store
        .append_comment_to_blog(blog_id, &comment.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(state.store.comment_response(&comment).await),
    ))
}
