//! Pure aggregation helpers over in-memory blog lists.
//!
//! All functions only read their input and break ties by first-seen order,
//! so results are deterministic for a given input sequence.

use serde::Serialize;

use crate::models::Blog;

/// Author paired with how many blogs they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

/// Author paired with the sum of likes across their blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// Sum of likes across all blogs. 0 for an empty list.
pub fn total_likes(blogs: &[Blog]) -> u64 {
    blogs.iter().map(|b| b.likes).sum()
}

/// The blog with the most likes; the first one wins ties.
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    let mut favorite: Option<&Blog> = None;
    for blog in blogs {
        match favorite {
            Some(current) if blog.likes <= current.likes => {}
            _ => favorite = Some(blog),
        }
    }
    favorite
}

/// The author with the most blogs; ties go to the author seen first.
pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogs> {
    let counts = accumulate(blogs, |_| 1);
    pick_max(counts).map(|(author, blogs)| AuthorBlogs {
        author,
        blogs: blogs as usize,
    })
}

/// The author with the highest aggregate likes; ties go to the author seen
/// first.
pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    let totals = accumulate(blogs, |b| b.likes);
    pick_max(totals).map(|(author, likes)| AuthorLikes { author, likes })
}

/// Per-author accumulation preserving first-seen author order.
fn accumulate(blogs: &[Blog], value: impl Fn(&Blog) -> u64) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    for blog in blogs {
        match totals.iter_mut().find(|(author, _)| *author == blog.author) {
            Some((_, total)) => *total += value(blog),
            None => totals.push((blog.author.clone(), value(blog))),
        }
    }
    totals
}

/// First entry with the strictly greatest value.
fn pick_max(entries: Vec<(String, u64)>) -> Option<(String, u64)> {
    let mut best: Option<(String, u64)> = None;
    for (author, value) in entries {
        match &best {
            Some((_, max)) if value <= *max => {}
            _ => best = Some((author, value)),
        }
    }
    best
}
