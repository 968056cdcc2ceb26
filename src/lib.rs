//! Bloglist REST API
//!
//! Thin CRUD over a JSON document store: users register, authenticate with
//! bearer tokens, create and mutate blogs, and attach comments.

pub mod auth;
pub mod config;
pub mod core;
pub mod handlers;
pub mod list_helper;
pub mod models;
pub mod router;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{AppState, Config};
use store::JsonStore;

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    let config = Config::from_env()?;
    config.ensure_dirs().await?;

    info!("data directory: {:?}", config.data_dir);
    if config.test_mode {
        info!("running in test mode, reset endpoint mounted");
    }

    let store = Arc::new(JsonStore::new(config.clone()).await?);

    let state = AppState {
        config: config.clone(),
        store,
    };

    let app = router::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("bloglist server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
