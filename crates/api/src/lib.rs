//! # TalentGate API
//!
//! HTTP surface of the interview slot booking service.
//!
//! ## Architecture
//!
//! - **Routes**: URL structure, split into applicant and staff endpoints
//! - **Handlers**: extract and validate requests, call the [`Scheduler`], wrap results in the envelope
//! - **Middleware**: error-to-status mapping and the JSON envelope
//! - **Config**: environment configuration
//! - **Mailer**: SMTP and logging notifiers
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Email delivery
pub mod mailer;
/// Error handling and response envelope
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use chrono_tz::Tz;
use eyre::Result;
use talentgate_core::{
    clock::CivilClock,
    notify::Notifier,
    scheduling::Scheduler,
};
use talentgate_db::{DbPool, PgInterviewStore};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub scheduler: Scheduler,
    /// Civil timezone the scheduler's clock runs in
    pub timezone: Tz,
}

impl ApiState {
    /// Wires the production collaborators: PostgreSQL store, civil clock and
    /// SMTP delivery (or logging when no relay is configured).
    pub fn from_config(config: &config::ApiConfig, db_pool: DbPool) -> Result<Self> {
        let store = Arc::new(PgInterviewStore::new(db_pool, config.timezone));
        let notifier: Arc<dyn Notifier> = match &config.smtp {
            Some(smtp) => Arc::new(mailer::SmtpNotifier::new(smtp)?),
            None => {
                warn!("SMTP_HOST not set, emails will only be logged");
                Arc::new(mailer::LogNotifier)
            }
        };
        let clock = Arc::new(CivilClock::new(config.timezone));

        Ok(Self {
            scheduler: Scheduler::new(store, notifier, clock, config.scheduler.clone()),
            timezone: config.timezone,
        })
    }
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Applicant-facing booking endpoints
        .merge(routes::entrevistas::routes())
        // Staff endpoints
        .merge(routes::admin::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        timezone = config.timezone.name(),
        time_window = %config.scheduler.time_window,
        ticket_attempts = config.scheduler.max_ticket_attempts,
        smtp = config.smtp.is_some(),
        db_max_connections = config.database_max_connections,
        "starting interview booking service"
    );

    let state = Arc::new(ApiState::from_config(&config, db_pool)?);
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(timezone = config.timezone.name(), "Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
