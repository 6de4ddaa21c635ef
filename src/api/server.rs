//! HTTP server setup and routing.
//!
//! Routes mirror the endpoints consumed by the front end; all business
//! logic lives in the store, ingestor, and enricher.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::ai::Enricher;
use crate::db::Repository;
use crate::error::Result;
use crate::feed::FeedIngestor;

use super::handlers;

/// Shared application context passed to all handlers.
#[derive(Clone)]
pub struct AppContext {
    pub repo: Arc<Repository>,
    pub ingestor: Arc<FeedIngestor>,
    pub enricher: Arc<Enricher>,
    pub feed_urls: Arc<Vec<String>>,
    pub fetch_limit: usize,
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::get_latest_papers))
        .route("/paper/:id", get(handlers::get_paper))
        .route("/allPapers", get(handlers::get_all_papers))
        .route("/summarize", post(handlers::summarize_paper))
        .route("/update", get(handlers::update_papers))
        .route("/userSettings", get(handlers::get_user_settings))
        .route("/updateUser", post(handlers::update_user_settings))
        // Single-tenant local backend; the front end runs on another origin.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

pub async fn run(ctx: AppContext, listen_addr: &str) -> Result<()> {
    let app = router(ctx);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
