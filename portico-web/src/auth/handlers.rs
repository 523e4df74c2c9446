//! Authentication handlers: session proxy login, logout and current user

use super::{cookies, jwt::AuthError, CurrentUser};
use crate::{
    handlers::{
        safe_next,
        types::{LoginErrorResponse, MessageResponse},
    },
    upstream::UpstreamError,
    AppState,
};
use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use portico_core::{LoginRequest, Session, User, DASHBOARD_ROUTE};
use serde::Deserialize;
use tracing::{error, info, warn};

/// Body text of every failed login, whatever the cause
pub const LOGIN_FAILED: &str = "Login failed";

/// Login failures
///
/// The client always sees `{"error": "Login failed"}`; `code` tells the
/// categories apart without forwarding upstream detail.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid login request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("failed to establish session: {0}")]
    Session(String),
}

impl LoginError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            LoginError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            LoginError::Upstream(UpstreamError::Rejected { .. }) => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials")
            }
            LoginError::Upstream(
                UpstreamError::MalformedResponse(_) | UpstreamError::UnexpectedStatus { .. },
            ) => (StatusCode::INTERNAL_SERVER_ERROR, "bad_upstream_response"),
            LoginError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_unavailable"),
            LoginError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "session_error"),
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        (
            status,
            Json(LoginErrorResponse {
                error: LOGIN_FAILED.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for LoginError {
    fn from(err: AuthError) -> Self {
        LoginError::Session(err.to_string())
    }
}

/// Credentials posted by the login page form
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Page to continue to after signing in
    #[serde(default)]
    pub next: Option<String>,
}

/// Login body, JSON from scripts or a urlencoded form from the login page
pub enum LoginPayload {
    Json(LoginRequest),
    Form(LoginForm),
}

fn invalid_payload(detail: String) -> LoginError {
    warn!("Rejected login payload: {}", detail);
    LoginError::InvalidRequest(detail)
}

impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = LoginError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(form) = Form::<LoginForm>::from_request(req, state)
                .await
                .map_err(|e| invalid_payload(e.body_text()))?;
            Ok(LoginPayload::Form(form))
        } else {
            let Json(request) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| invalid_payload(e.body_text()))?;
            Ok(LoginPayload::Json(request))
        }
    }
}

/// Session proxy login
///
/// Relays the credentials to the upstream authentication API. On success the
/// upstream `{token, user}` is persisted as cookies. JSON callers get it back
/// unchanged; form posts are redirected to their `next` page instead.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Forward credentials to the upstream authentication API and set session cookies. \
                   Also accepts an application/x-www-form-urlencoded body with an optional `next` \
                   field, answered with a 303 redirect.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token, user and session cookies set", body = Session),
        (status = 303, description = "Form login succeeded; cookies set, redirect to `next` or /dashboard"),
        (status = 400, description = "Malformed request", body = LoginErrorResponse),
        (status = 401, description = "Upstream rejected the credentials", body = LoginErrorResponse),
        (status = 500, description = "Upstream unreachable or misbehaving", body = LoginErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: LoginPayload,
) -> Result<Response, LoginError> {
    let (request, redirect_to) = match payload {
        LoginPayload::Json(request) => (request, None),
        LoginPayload::Form(form) => {
            let target = safe_next(form.next.as_deref()).unwrap_or(DASHBOARD_ROUTE);
            let target = target.to_string();
            (LoginRequest::new(form.email, form.password), Some(target))
        }
    };
    request
        .validate()
        .map_err(|e| LoginError::InvalidRequest(e.to_string()))?;

    info!(email = %request.email, "Login attempt");

    let session = state.upstream.login(&request).await.map_err(|e| {
        e.to_portico_error().log();
        LoginError::from(e)
    })?;

    let signed = state.signer.issue(&session.user)?;
    let jar = cookies::write_session(jar, &session, signed, &state.config.session).map_err(|e| {
        error!("Failed to serialize user cookie: {}", e);
        LoginError::Session(e.to_string())
    })?;

    info!(
        user_id = %session.user.id,
        role = %session.user.role,
        "User logged in"
    );

    Ok(match redirect_to {
        Some(target) => (jar, Redirect::to(&target)).into_response(),
        None => (jar, Json(session)).into_response(),
    })
}

/// Logout endpoint
///
/// Sessions are stateless, so logging out means removing the cookies.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Log out",
    responses(
        (status = 200, description = "Session cookies removed", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    info!("User logout");
    (
        cookies::clear_session(jar),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Get current user information
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    responses(
        (status = 200, description = "User of the verified session", body = User),
        (status = 401, description = "No valid session")
    )
)]
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
