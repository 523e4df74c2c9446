//! Crawler documents, health, OpenAPI and fallback routes

mod helpers;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use helpers::test_config;
use http_body_util::BodyExt;
use portico_web::{create_app, AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app_for_site(app_url: &str) -> axum::Router {
    let mut config = test_config("http://127.0.0.1:9");
    config.site.app_url = app_url.to_string();
    create_app(AppState::new(config).unwrap())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn robots_txt_lists_disallowed_paths_and_sitemap() {
    let (status, content_type, body) = get(app_for_site("https://admin.example.com/"), "/robots.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert!(body.contains("User-Agent: *"));
    assert!(body.contains("Allow: /"));
    for path in [
        "/api/",
        "/auth/verification-status",
        "/dashboard/*/edit",
        "/dashboard/*/settings",
    ] {
        assert!(body.contains(&format!("Disallow: {path}")), "missing {path}");
    }
    assert!(body.contains("Sitemap: https://admin.example.com/sitemap.xml"));
}

#[tokio::test]
async fn robots_txt_uses_default_base_url() {
    let (_, _, body) = get(app_for_site("http://localhost:3000"), "/robots.txt").await;
    assert!(body.contains("Sitemap: http://localhost:3000/sitemap.xml"));
}

#[tokio::test]
async fn sitemap_lists_public_routes() {
    let (status, content_type, body) = get(app_for_site("https://admin.example.com"), "/sitemap.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/xml"));
    assert!(body.contains("<loc>https://admin.example.com/</loc>"));
    assert!(body.contains("<loc>https://admin.example.com/login</loc>"));
    assert!(!body.contains("/dashboard"));
}

#[tokio::test]
async fn health_reports_version() {
    let (status, _, body) = get(app_for_site("http://localhost:3000"), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, _, body) = get(app_for_site("http://localhost:3000"), "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["paths"]["/api/auth/login"]["post"].is_object());
}

#[tokio::test]
async fn unknown_route_renders_not_found_page() {
    let (status, content_type, body) = get(app_for_site("http://localhost:3000"), "/no/such/page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("/no/such/page"));
}

#[tokio::test]
async fn middleware_stack_applies_to_every_route() {
    for uri in ["/robots.txt", "/api/health", "/no/such/page"] {
        let response = app_for_site("http://localhost:3000")
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY", "{uri}");
        assert_eq!(headers["x-content-type-options"], "nosniff", "{uri}");
        assert_eq!(
            headers["access-control-allow-origin"], "http://localhost:3000",
            "{uri}"
        );
    }
}
