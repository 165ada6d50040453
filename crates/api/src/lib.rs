//! # CourseTrack API
//!
//! HTTP surface for the CourseTrack study planner. Every resource route is
//! owner-scoped: a bearer session resolves to an owner id before any handler
//! runs, and the core services never see a client-supplied owner.
//!
//! ## Architecture
//!
//! - **Routes**: URL structure, one module per resource
//! - **Handlers**: extract, call into `coursetrack-core`, shape the response
//! - **Middleware**: session authentication and error mapping
//! - **Config**: environment-driven server settings
//!
//! Persistence is injected through [`ApiState`], so the router runs unchanged
//! against PostgreSQL or the in-memory store used by the tests.

/// Configuration module for API settings
pub mod config;
/// Extractors with JSON error rejections
pub mod extract;
/// Request handlers
pub mod handlers;
/// Session authentication and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use chrono::{Duration, NaiveDate};
use coursetrack_core::{store::PlannerStore, time::Clock};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Owner-scoped persistence
    pub store: Arc<dyn PlannerStore>,
    /// Source of "today" for generation and views
    pub clock: Arc<dyn Clock>,
    /// Lifetime of a login session
    pub session_ttl: Duration,
}

impl ApiState {
    pub fn new(store: Arc<dyn PlannerStore>, clock: Arc<dyn Clock>, session_ttl: Duration) -> Self {
        Self {
            store,
            clock,
            session_ttl,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Builds the full router: public auth and health routes plus every
/// resource route behind [`middleware::auth::require_auth`].
pub fn app(state: Arc<ApiState>) -> Router {
    let protected = Router::new()
        .merge(routes::auth::session_routes())
        .merge(routes::semesters::routes())
        .merge(routes::courses::routes())
        .merge(routes::task_definitions::routes())
        .merge(routes::task_instances::routes())
        .merge(routes::assignments::routes())
        .merge(routes::notes::routes())
        .merge(routes::views::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Signup and login
        .merge(routes::auth::routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and state
///
/// # Example
///
/// ```ignore
/// let config = config::ApiConfig::from_env()?;
/// let pool = coursetrack_db::create_pool(&config.database_url, config.db_max_connections).await?;
/// let state = ApiState::new(Arc::new(PgStore::new(pool)), Arc::new(SystemClock), config.session_ttl());
/// start_server(config, Arc::new(state)).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(StdDuration::from_secs(
                config.request_timeout,
            )))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
