//! Cross-cutting request plumbing: error type and authenticated context.

pub mod ctx;
pub mod error;

pub use ctx::Ctx;
pub use error::{Error, Result};
