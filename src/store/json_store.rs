//! JSON-file document store.
//!
//! Each collection (users, blogs, comments) lives in one JSON file under the
//! data directory, cached in memory behind an `RwLock` and written back
//! atomically (temp file + rename) on every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::core::error::{Error, Result};
use crate::models::{
    Blog, BlogRef, BlogResponse, Comment, CommentResponse, OwnerRef, ParentBlogRef, User,
    UserResponse,
};

const MIN_USERNAME_LEN: usize = 3;

/// Fields accepted when creating a blog. `likes` defaults to 0 when absent.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

/// JSON-backed document store for users, blogs and comments.
pub struct JsonStore {
    config: Config,
    users: RwLock<HashMap<String, User>>,
    blogs: RwLock<HashMap<String, Blog>>,
    comments: RwLock<HashMap<String, Comment>>,
}

impl JsonStore {
    /// Create a store rooted at the configured data directory, loading any
    /// existing collections from disk.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.ensure_dirs().await?;

        let users: Vec<User> = load_collection(&config.data_dir.join("users.json")).await?;
        let blogs: Vec<Blog> = load_collection(&config.data_dir.join("blogs.json")).await?;
        let comments: Vec<Comment> =
            load_collection(&config.data_dir.join("comments.json")).await?;

        info!(
            "JsonStore initialized with {} users, {} blogs, {} comments",
            users.len(),
            blogs.len(),
            comments.len()
        );

        Ok(Self {
            config,
            users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
            blogs: RwLock::new(blogs.into_iter().map(|b| (b.id.clone(), b)).collect()),
            comments: RwLock::new(comments.into_iter().map(|c| (c.id.clone(), c)).collect()),
        })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.config.data_dir.join(format!("{}.json", name))
    }

    // ----- users -----

    /// Create a user. The store enforces username length and uniqueness;
    /// the password must already be hashed by the caller.
    pub async fn add_user(
        &self,
        username: String,
        name: String,
        password_hash: String,
    ) -> Result<User> {
        if username.len() < MIN_USERNAME_LEN {
            return Err(Error::Validation(format!(
                "username must be at least {} characters long",
                MIN_USERNAME_LEN
            )));
        }

        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == username) {
            return Err(Error::Validation("username is already taken".to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            name,
            password_hash,
            created_at: Utc::now(),
            blogs: Vec::new(),
        };

        users.insert(user.id.clone(), user.clone());
        self.persist_users(&users).await?;

        info!("created user {}", user.username);

        Ok(user)
    }

    pub async fn find_user(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// All users in creation order.
    pub async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    /// Append a blog id to the owner's denormalized blog list.
    pub async fn append_blog_to_user(&self, user_id: &str, blog_id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(Error::UserNotFound)?;
        user.blogs.push(blog_id.to_string());
        self.persist_users(&users).await?;
        Ok(())
    }

    // ----- blogs -----

    /// Create a blog owned by `user_id`. Title, author and url are required.
    pub async fn add_blog(&self, new: NewBlog, user_id: &str) -> Result<Blog> {
        let title = require_field(new.title, "title")?;
        let author = require_field(new.author, "author")?;
        let url = require_field(new.url, "url")?;

        let blog = Blog {
            id: Uuid::new_v4().to_string(),
            title,
            author,
            url,
            likes: new.likes.unwrap_or(0),
            user: user_id.to_string(),
            created_at: Utc::now(),
            comments: Vec::new(),
        };

        let mut blogs = self.blogs.write().await;
        blogs.insert(blog.id.clone(), blog.clone());
        self.persist_blogs(&blogs).await?;

        info!("created blog {} ({})", blog.title, blog.id);

        Ok(blog)
    }

    pub async fn find_blog(&self, id: &str) -> Option<Blog> {
        self.blogs.read().await.get(id).cloned()
    }

    /// All blogs in creation order.
    pub async fn list_blogs(&self) -> Vec<Blog> {
        let mut blogs: Vec<Blog> = self.blogs.read().await.values().cloned().collect();
        blogs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        blogs
    }

    /// Replace a blog's like count. Likes are the only mutable blog field.
    pub async fn update_likes(&self, id: &str, likes: u64) -> Result<Blog> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs.get_mut(id).ok_or(Error::BlogNotFound)?;
        blog.likes = likes;
        let updated = blog.clone();
        self.persist_blogs(&blogs).await?;
        Ok(updated)
    }

    /// Remove a blog, returning the deleted document.
    pub async fn delete_blog(&self, id: &str) -> Result<Blog> {
        let mut blogs = self.blogs.write().await;
        let deleted = blogs.remove(id).ok_or(Error::BlogNotFound)?;
        self.persist_blogs(&blogs).await?;

        info!("deleted blog {} ({})", deleted.title, deleted.id);

        Ok(deleted)
    }

    /// Append a comment id to the parent blog's comment list.
    pub async fn append_comment_to_blog(&self, blog_id: &str, comment_id: &str) -> Result<()> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs.get_mut(blog_id).ok_or(Error::BlogNotFound)?;
        blog.comments.push(comment_id.to_string());
        self.persist_blogs(&blogs).await?;
        Ok(())
    }

    // ----- comments -----

    pub async fn add_comment(&self, content: String, blog_id: &str) -> Result<Comment> {
        if content.trim().is_empty() {
            return Err(Error::Validation("content is required".to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            content,
            blog: blog_id.to_string(),
            created_at: Utc::now(),
        };

        let mut comments = self.comments.write().await;
        comments.insert(comment.id.clone(), comment.clone());
        self.persist_comments(&comments).await?;

        Ok(comment)
    }

    // ----- reference expansion -----

    /// Blog with its owner expanded to `{username, name}`.
    pub async fn blog_response(&self, blog: &Blog) -> BlogResponse {
        let users = self.users.read().await;
        let user = users.get(&blog.user).map(|u| OwnerRef {
            username: u.username.clone(),
            name: u.name.clone(),
        });

        BlogResponse {
            id: blog.id.clone(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user,
            comments: blog.comments.clone(),
        }
    }

    /// User with owned blogs expanded to `{id, title, author, url}`.
    pub async fn user_response(&self, user: &User) -> UserResponse {
        let blogs = self.blogs.read().await;
        let expanded = user
            .blogs
            .iter()
            .filter_map(|id| blogs.get(id))
            .map(|b| BlogRef {
                id: b.id.clone(),
                title: b.title.clone(),
                author: b.author.clone(),
                url: b.url.clone(),
            })
            .collect();

        UserResponse {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            blogs: expanded,
        }
    }

    /// Comment with its parent blog expanded to `{title, author}`.
    pub async fn comment_response(&self, comment: &Comment) -> CommentResponse {
        let blogs = self.blogs.read().await;
        let blog = blogs.get(&comment.blog).map(|b| ParentBlogRef {
            title: b.title.clone(),
            author: b.author.clone(),
        });

        CommentResponse {
            id: comment.id.clone(),
            content: comment.content.clone(),
            blog,
        }
    }

    // ----- test support -----

    /// Wipe all collections. Backs the test-mode reset endpoint.
    pub async fn clear_all(&self) -> Result<()> {
        let mut users = self.users.write().await;
        let mut blogs = self.blogs.write().await;
        let mut comments = self.comments.write().await;

        users.clear();
        blogs.clear();
        comments.clear();

        self.persist_users(&users).await?;
        self.persist_blogs(&blogs).await?;
        self.persist_comments(&comments).await?;

        Ok(())
    }

    // ----- persistence -----

    async fn persist_users(&self, users: &HashMap<String, User>) -> anyhow::Result<()> {
        save_collection(&self.collection_path("users"), users.values()).await
    }

    async fn persist_blogs(&self, blogs: &HashMap<String, Blog>) -> anyhow::Result<()> {
        save_collection(&self.collection_path("blogs"), blogs.values()).await
    }

    async fn persist_comments(&self, comments: &HashMap<String, Comment>) -> anyhow::Result<()> {
        save_collection(&self.collection_path("comments"), comments.values()).await
    }
}

fn require_field(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

async fn load_collection<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {:?}", path))
}

/// Write a collection to disk atomically: temp file, then rename.
async fn save_collection<'a, T, I>(path: &Path, docs: I) -> anyhow::Result<()>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    let docs: Vec<&T> = docs.collect();
    let json = serde_json::to_string_pretty(&docs)?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, json).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
