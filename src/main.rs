//! Course Hub Backend
//!
//! A production-grade REST backend with SQLite persistence powering discussion-group
//! scheduling and group switching for cohort-based courses.

mod api;
mod auth;
mod availability;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Course Hub Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    match config.max_group_size {
        Some(size) => tracing::info!("Group capacity limit: {}", size),
        None => tracing::info!("Group capacity limit: unlimited"),
    }

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (HUB_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Revision
        .route("/revision", get(api::get_revision))
        // Groups
        .route("/groups", get(api::list_groups))
        .route("/groups", post(api::create_group))
        .route("/groups/{id}", get(api::get_group))
        .route("/groups/{id}", put(api::update_group))
        .route("/groups/{id}", delete(api::delete_group))
        // Discussions
        .route("/discussions", get(api::list_discussions))
        .route("/discussions", post(api::create_discussion))
        .route("/discussions/{id}", get(api::get_discussion))
        .route("/discussions/{id}", delete(api::delete_discussion))
        // Group switching
        .route("/rounds/{round_id}/availability", get(api::get_availability))
        .route(
            "/rounds/{round_id}/switch-requests",
            post(api::create_switch_request),
        )
        .route(
            "/rounds/{round_id}/switch-requests",
            get(api::list_switch_requests),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
