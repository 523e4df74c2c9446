//! Route definitions for the Portico web server

use crate::{auth, handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use portico_core::{DASHBOARD_ROUTE, HOME_ROUTE, LOGIN_ROUTE, REWARD_SETTINGS_ROUTE};

/// Public path of the login endpoint
pub const LOGIN_ENDPOINT: &str = "/api/auth/login";

/// Create API routes, nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        // Session proxy
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/logout", post(auth::handlers::logout))
        .route("/auth/me", get(auth::handlers::current_user))
}

/// Create rendered page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route(HOME_ROUTE, get(handlers::index))
        .route(LOGIN_ROUTE, get(handlers::login_page))
        .route(DASHBOARD_ROUTE, get(handlers::dashboard))
        .route(REWARD_SETTINGS_ROUTE, get(handlers::reward_settings))
}

/// Create crawler routes
pub fn seo_routes() -> Router<AppState> {
    Router::new()
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/sitemap.xml", get(handlers::sitemap_xml))
}
