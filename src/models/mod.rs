//! Persisted documents and their expanded response views.
//!
//! Stored records carry raw reference ids; responses replace those ids with
//! partial copies of the referenced documents ("populate").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User document. The password hash is persisted but never returned over
/// HTTP; responses go through [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized index of owned blog ids. The blog's `user` field is
    /// authoritative.
    #[serde(default)]
    pub blogs: Vec<String>,
}

/// Blog document. `user` is set at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(default)]
    pub likes: u64,
    pub user: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<String>,
}

/// Comment document, immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub blog: String,
    pub created_at: DateTime<Utc>,
}

/// Owner reference as it appears inside a blog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRef {
    pub username: String,
    pub name: String,
}

/// Blog reference as it appears inside a user response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogRef {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
}

/// Blog reference as it appears inside a comment response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentBlogRef {
    pub title: String,
    pub author: String,
}

/// Blog with its owner expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,
    pub user: Option<OwnerRef>,
    pub comments: Vec<String>,
}

/// User with owned blogs expanded. No sensitive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blogs: Vec<BlogRef>,
}

/// Comment with its parent blog expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub blog: Option<ParentBlogRef>,
}
