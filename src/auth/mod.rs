//! Token signing/verification and password hashing.
//!
//! Tokens are HS256 JWTs carrying the username and user id. They encode no
//! expiry, so verification disables the exp requirement.

pub mod middleware;

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub id: String,
}

/// Sign a token for the given claims.
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign token")
}

/// Verify a token's signature and decode its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .context("invalid token")?;

    Ok(data.claims)
}

/// Hash a password with a salted one-way hash.
pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).context("failed to hash password")
}

/// Compare a candidate password against a stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    verify(password, password_hash).context("failed to verify password")
}
