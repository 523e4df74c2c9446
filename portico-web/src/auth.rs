//! Authentication and authorization extractors
//!
//! The current user is always derived from the signed `session` cookie. Page
//! extractors run the access guard and turn its decision into a redirect.

pub mod cookies;
pub mod handlers;
pub mod jwt;

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use portico_core::{AccessGuard, Role, User};
use std::convert::Infallible;
use tracing::{debug, info};

pub use jwt::AuthError;

/// Read and verify the session cookie
pub fn user_from_jar(state: &AppState, jar: &CookieJar) -> Option<User> {
    let cookie = jar.get(cookies::SESSION_COOKIE)?;
    match state.signer.verify(cookie.value()) {
        Ok(claims) => Some(claims.user),
        Err(e) => {
            debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

/// Optional user extractor - doesn't fail if user is not authenticated
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(OptionalUser(user_from_jar(&app_state, &jar)))
    }
}

/// Authenticated user extractor for JSON endpoints, 401 when absent
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        user.map(CurrentUser).ok_or(AuthError::MissingSession)
    }
}

/// Redirect produced by the access guard
#[derive(Debug)]
pub struct AccessRedirect(pub String);

impl IntoResponse for AccessRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.0).into_response()
    }
}

/// Run `guard` for the request described by `parts`
async fn admit<S>(
    parts: &mut Parts,
    state: &S,
    guard: AccessGuard,
) -> Result<Option<User>, AccessRedirect>
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    let OptionalUser(user) = OptionalUser::from_request_parts(parts, state)
        .await
        .unwrap_or_else(|never| match never {});

    let requested = parts
        .extensions
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let decision = guard.evaluate(user.as_ref());
    match guard.redirect_target(decision, &requested) {
        None => Ok(user),
        Some(target) => {
            info!(
                path = %requested,
                user_id = ?user.as_ref().map(|u| u.id.to_string()),
                decision = ?decision,
                "Access guard redirect to {}",
                target
            );
            Err(AccessRedirect(target))
        }
    }
}

/// Dashboard visitor - any authenticated user
///
/// Holds `None` only when the unauthenticated policy allows anonymous renders.
pub struct DashboardUser(pub Option<User>);

impl<S> FromRequestParts<S> for DashboardUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AccessRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = AppState::from_ref(state).access_guard(None);
        admit(parts, state, guard).await.map(DashboardUser)
    }
}

/// Admin page visitor - requires the ADMIN role
pub struct AdminUser(pub Option<User>);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AccessRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = AppState::from_ref(state).access_guard(Some(Role::Admin));
        admit(parts, state, guard).await.map(AdminUser)
    }
}
