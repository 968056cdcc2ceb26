//! Blog handlers. Creation, update and deletion require a verified token;
//! update and deletion additionally require ownership.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::models::BlogResponse;
use crate::store::json_store::NewBlog;

use super::validate_id;

/// Only `likes` is mutable after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub likes: u64,
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogResponse>>> {
    let blogs = state.store.list_blogs().await;

    let mut expanded = Vec::with_capacity(blogs.len());
    for blog in &blogs {
        expanded.push(state.store.blog_response(blog).await);
    }

    Ok(Json(expanded))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>> {
    let id = validate_id(&id)?;
    let blog = state.store.find_blog(id).await.ok_or(Error::BlogNotFound)?;

    Ok(Json(state.store.blog_response(&blog).await))
}

/// POST /api/blogs (protected). The authenticated user becomes the owner and
/// the blog id is appended to their blog list.
pub async fn create_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(new): Json<NewBlog>,
) -> Result<(StatusCode, Json<BlogResponse>)> {
    let blog = state.store.add_blog(new, ctx.user_id()).await?;
    state.store.append_blog_to_user(ctx.user_id(), &blog.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(state.store.blog_response(&blog).await),
    ))
}

/// PUT /api/blogs/{id} (protected, owner only). Failure short-circuits
/// before anything is written.
pub async fn update_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(update): Json<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>> {
    let id = validate_id(&id)?;
    let blog = state.store.find_blog(id).await.ok_or(Error::BlogNotFound)?;

    if blog.user != ctx.user_id() {
        warn!("user {} tried to update blog {}", ctx.username(), blog.id);
        return Err(Error::NotOwner);
    }

    let updated = state.store.update_likes(id, update.likes).await?;

    Ok(Json(state.store.blog_response(&updated).await))
}

/// DELETE /api/blogs/{id} (protected, owner only). Returns the deleted blog
/// with its owner expanded.
pub async fn delete_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>> {
    let id = validate_id(&id)?;
    let blog = state.store.find_blog(id).await.ok_or(Error::BlogNotFound)?;

    if blog.user != ctx.user_id() {
        warn!("user {} tried to delete blog {}", ctx.username(), blog.id);
        return Err(Error::NotOwner);
    }

    let deleted = state.store.delete_blog(id).await?;

    Ok(Json(state.store.blog_response(&deleted).await))
}
