//! HTTP resource handlers.

pub mod blogs;
pub mod comments;
pub mod login;
pub mod testing;
pub mod users;

use uuid::Uuid;

use crate::core::error::{Error, Result};

/// Path ids must be well-formed UUIDs; anything else is a 400, never a 404.
fn validate_id(id: &str) -> Result<&str> {
    Uuid::parse_str(id).map_err(|_| Error::InvalidId)?;
    Ok(id)
}
