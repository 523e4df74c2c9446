//! Crawler-facing documents

use crate::AppState;
use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};

/// `robots.txt`
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.robots.render(),
    )
}

/// `sitemap.xml`
pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        state.sitemap.render(),
    )
}
