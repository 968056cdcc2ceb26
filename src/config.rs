//! Server configuration and shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::store::JsonStore;

/// Configuration resolved once at startup from the process environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Directory holding the JSON document collections.
    pub data_dir: PathBuf,
    /// HMAC secret for signing and verifying bearer tokens.
    pub secret: String,
    /// Test mode switches the data directory and mounts the reset endpoint.
    pub test_mode: bool,
}

impl Config {
    /// Read configuration from the environment, failing fast with a
    /// descriptive error when a required variable is missing.
    ///
    /// `APP_ENV=test` selects `TEST_DATA_DIR` over `DATA_DIR`.
    pub fn from_env() -> anyhow::Result<Self> {
        let test_mode = std::env::var("APP_ENV").map(|v| v == "test").unwrap_or(false);

        let port = std::env::var("PORT")
            .context("PORT is not set")?
            .parse::<u16>()
            .context("PORT is not a valid port number")?;

        let data_dir = if test_mode {
            std::env::var("TEST_DATA_DIR").context("TEST_DATA_DIR is not set")?
        } else {
            std::env::var("DATA_DIR").context("DATA_DIR is not set")?
        };

        let secret = std::env::var("SECRET_TOKEN").context("SECRET_TOKEN is not set")?;

        Ok(Self {
            port,
            data_dir: PathBuf::from(data_dir),
            secret,
            test_mode,
        })
    }

    /// Config rooted at a custom directory, used by tests.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            port: 0,
            data_dir: base_dir.into(),
            secret: "test-secret".to_string(),
            test_mode: true,
        }
    }

    /// Ensure the data directory exists.
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

/// App state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<JsonStore>,
}
