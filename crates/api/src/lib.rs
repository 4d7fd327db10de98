//! # Barberbook API
//!
//! The API crate provides the web server for the shop's appointment booking
//! widget and admin dashboard.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Admin sessions and error-to-response mapping
//! - **Notifier**: Background delivery of booking webhooks
//! - **Config**: Environment-driven settings
//!
//! Slots are held by a [`SlotStore`]: in memory by default, or in Postgres
//! when `DATABASE_URL` is set. The window is regenerated on every start.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Booking webhook delivery
pub mod notifier;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use barberbook_core::schedule::generate_weekly_slots;
use barberbook_db::{
    MemorySlotStore, PgSlotStore, SlotStore, create_pool, schema::initialize_database,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{config::ApiConfig, middleware::auth::AdminGate, notifier::Notifier};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Current slot window
    pub store: Arc<dyn SlotStore>,
    /// Booking notification handle
    pub notifier: Notifier,
    /// Admin credential and sessions
    pub admin: AdminGate,
    pub shop_name: String,
}

/// Assembles state from configuration and installs a fresh slot window.
///
/// Selects the Postgres store when a database URL is configured, creating
/// the schema if needed, and the in-memory store otherwise. Any slots left
/// over from a previous run are discarded.
pub async fn build_state(config: &ApiConfig) -> Result<Arc<ApiState>> {
    let store: Arc<dyn SlotStore> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            initialize_database(&pool).await?;
            info!("Using Postgres slot store");
            Arc::new(PgSlotStore::new(pool))
        }
        None => {
            info!("Using in-memory slot store");
            Arc::new(MemorySlotStore::new())
        }
    };

    let today = config.today();
    let slots = generate_weekly_slots(today);
    info!("Generated {} slots starting {}", slots.len(), today);
    store
        .replace_all(slots)
        .await
        .wrap_err("Failed to install slot window")?;

    let notifier = match &config.webhook {
        Some(webhook) => Notifier::spawn(webhook.clone())?,
        None => {
            warn!("WEBHOOK_URL is not configured; booking notifications are skipped");
            Notifier::disabled()
        }
    };

    let admin = AdminGate::new(&config.admin)?;
    if !config.admin.require_session {
        warn!("Admin sessions are not enforced on slot toggling");
    }

    Ok(Arc::new(ApiState {
        store,
        notifier,
        admin,
        shop_name: config.shop_name.clone(),
    }))
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Banner, health and version endpoints
        .merge(routes::health::routes())
        // Slot listing, booking and toggling
        .merge(routes::appointments::routes())
        // Admin login
        .merge(routes::auth::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> Result<CorsLayer> {
    let Some(origins) = &config.cors_origins else {
        return Ok(CorsLayer::permissive());
    };

    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration
///
/// Initializes logging, builds the shared state, applies tracing, timeout
/// and CORS layers, and serves until Ctrl-C.
pub async fn start_server(config: ApiConfig) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = build_state(&config).await?;

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .layer(cors_layer(&config)?),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
