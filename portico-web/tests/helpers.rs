//! Integration test helpers
//!
//! Spawns the full application on a random port, pointed at a mock
//! upstream authentication API.

#![allow(dead_code)]

use portico_core::{PorticoConfig, UnauthenticatedPolicy};
use portico_web::{create_app, AppState};
use reqwest::header::{COOKIE, SET_COOKIE};
use std::sync::LazyLock;
use tokio::net::TcpListener;

// Tracing is initialized once per test binary
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Running application under test
pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/login", &self.address))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// POST the login page form, as a browser without scripts would
    pub async fn post_login_form(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/login", &self.address))
            .form(fields)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_logout(&self, cookies: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/logout", &self.address))
            .header(COOKIE, cookies)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// GET `path`, optionally with a `Cookie` header
    pub async fn get(&self, path: &str, cookies: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.get(format!("{}{}", &self.address, path));
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }
        request.send().await.expect("Failed to execute request.")
    }
}

/// Default test configuration for an upstream at `upstream_url`
pub fn test_config(upstream_url: &str) -> PorticoConfig {
    let mut config = PorticoConfig::default();
    config.server.dev_mode = true;
    config.upstream.base_url = upstream_url.to_string();
    config.upstream.max_retries = 1;
    config.upstream.retry_backoff_ms = 1;
    config.upstream.timeout_secs = 2;
    config.session.secret = "integration-test-secret-with-enough-bytes".to_string();
    config
}

pub async fn spawn_app(upstream_url: &str) -> TestApp {
    spawn_app_with(test_config(upstream_url)).await
}

pub async fn spawn_app_with_policy(upstream_url: &str, policy: UnauthenticatedPolicy) -> TestApp {
    let mut config = test_config(upstream_url);
    config.guard.unauthenticated = policy;
    spawn_app_with(config).await
}

pub async fn spawn_app_with(config: PorticoConfig) -> TestApp {
    LazyLock::force(&TRACING);

    let state = AppState::new(config).expect("Failed to build state");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let app = create_app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        state,
        api_client,
    }
}

/// Turn the `Set-Cookie` headers of `response` into a `Cookie` header value
pub fn cookie_header(response: &reqwest::Response) -> String {
    set_cookie_pairs(response)
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `(name, raw value)` of every `Set-Cookie` header
pub fn set_cookie_pairs(response: &reqwest::Response) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| {
            let pair = value.to_str().ok()?.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            Some((name.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Mock upstream answering every login with `body`
///
/// Keep the returned mock alive for as long as the upstream is needed.
pub async fn mock_upstream(
    status: usize,
    body: serde_json::Value,
) -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
    (server, mock)
}
