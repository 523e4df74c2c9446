//! Client for the upstream authentication API
//!
//! Relays credentials to the upstream login endpoint and classifies every
//! failure so the caller can decide what to tell the browser. Transient
//! failures are retried with exponential backoff.

use crate::{WebError, WebResult};
use portico_core::{ErrorContext, LoginRequest, PorticoError, Session, UpstreamConfig};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Upstream login failures
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("upstream rejected the credentials with status {status}")]
    Rejected { status: StatusCode },
    #[error("upstream failed with status {status}")]
    ServerError { status: StatusCode },
    #[error("upstream answered with unexpected status {status}")]
    UnexpectedStatus { status: StatusCode },
    #[error("upstream returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::Unreachable(_) | UpstreamError::ServerError { .. }
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Rejected { status }
            | UpstreamError::ServerError { status }
            | UpstreamError::UnexpectedStatus { status } => Some(*status),
            UpstreamError::Unreachable(e) => e.status(),
            UpstreamError::MalformedResponse(_) => None,
        }
    }

    /// Convert into the shared error type, for logging
    pub fn to_portico_error(&self) -> PorticoError {
        PorticoError::Upstream {
            message: self.to_string(),
            status: self.status().map(|s| s.as_u16()),
            context: ErrorContext::new("upstream").with_operation("login"),
        }
    }
}

/// Upstream authentication client
#[derive(Debug, Clone)]
pub struct UpstreamAuthClient {
    client: reqwest::Client,
    config: UpstreamConfig,
    login_url: String,
}

impl UpstreamAuthClient {
    pub fn new(config: UpstreamConfig) -> WebResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(WebError::HttpClient)?;

        Ok(Self {
            client,
            login_url: config.login_url(),
            config,
        })
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Exchange credentials for an upstream session
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.try_login(request).await {
                Ok(session) => return Ok(session),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    warn!(
                        email = %request.email,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Upstream login attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_login(&self, request: &LoginRequest) -> Result<Session, UpstreamError> {
        debug!(url = %self.login_url, email = %request.email, "Forwarding login to upstream");

        let response = self
            .client
            .post(&self.login_url)
            .json(request)
            .send()
            .await
            .map_err(UpstreamError::Unreachable)?;

        let status = response.status();
        if status.is_client_error() {
            return Err(UpstreamError::Rejected { status });
        }
        if status.is_server_error() {
            return Err(UpstreamError::ServerError { status });
        }
        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus { status });
        }

        let body = response.bytes().await.map_err(UpstreamError::Unreachable)?;
        let session: Session = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        if session.token.is_empty() {
            return Err(UpstreamError::MalformedResponse(
                "empty session token".to_string(),
            ));
        }

        Ok(session)
    }
}
