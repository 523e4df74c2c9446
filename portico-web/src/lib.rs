//! Portico Web Server
//!
//! Session proxy for the upstream authentication API, role-gated dashboard
//! pages and crawler directives.

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;
pub mod upstream;

// Re-export main types
pub use server::{PorticoServer, PorticoServerBuilder};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Router,
};
use portico_core::{LoggingConfig, PorticoError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.site.base_url());

    Router::new()
        // API routes
        .nest("/api", routes::api_routes())
        // Rendered pages
        .merge(routes::page_routes())
        // robots.txt and sitemap.xml
        .merge(routes::seo_routes())
        .fallback(handlers::pages::not_found)
        // Add middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(64 * 1024))
                .layer(axum::middleware::from_fn(middleware::security_headers)),
        )
        .with_state(state)
}

/// CORS for the configured site origin, with credentials
fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("Site URL is not a valid CORS origin, cross-origin requests disabled: {}", e);
            cors
        }
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] PorticoError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(config: &LoggingConfig) -> WebResult<()> {
    portico_core::init_logging(config).map_err(|e| WebError::Logging(e.to_string()))
}
