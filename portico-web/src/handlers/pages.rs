//! Rendered pages

use crate::{
    auth::{AdminUser, DashboardUser, OptionalUser},
    routes::LOGIN_ENDPOINT,
    templates::{
        render, DashboardTemplate, IndexTemplate, LoginTemplate, NotFoundTemplate,
        RewardSettingsTemplate,
    },
    AppState, WebResult,
};
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use portico_core::{DASHBOARD_ROUTE, HOME_ROUTE, LOGIN_ROUTE, REWARD_SETTINGS_ROUTE};
use serde::Deserialize;
use tracing::debug;

/// Query string of the login page
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Accept `next` only when it is a plain path on this site
///
/// Browsers drop tabs and newlines from URLs, so `/\t/host` would turn
/// into `//host`. Only visible ASCII is accepted; anything else must arrive
/// percent-encoded.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| {
        path.starts_with('/')
            && !path.starts_with("//")
            && path.chars().all(|c| c.is_ascii_graphic() && c != '\\')
    })
}

/// Landing page
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> WebResult<Html<String>> {
    render(&IndexTemplate {
        meta: state.metadata.lookup(HOME_ROUTE),
        user: user.as_ref(),
    })
}

/// Login page
///
/// A visitor who already holds a valid session is sent on immediately.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> WebResult<Response> {
    let next = safe_next(query.next.as_deref());

    if let Some(user) = user {
        let target = next.unwrap_or(DASHBOARD_ROUTE);
        debug!(user_id = %user.id, "Already signed in, redirecting to {}", target);
        return Ok(Redirect::to(target).into_response());
    }

    Ok(render(&LoginTemplate {
        meta: state.metadata.lookup(LOGIN_ROUTE),
        next,
        login_endpoint: LOGIN_ENDPOINT,
    })?
    .into_response())
}

/// Dashboard home, any signed-in user
pub async fn dashboard(
    State(state): State<AppState>,
    DashboardUser(user): DashboardUser,
) -> WebResult<Html<String>> {
    render(&DashboardTemplate {
        meta: state.metadata.lookup(DASHBOARD_ROUTE),
        user: user.as_ref(),
    })
}

/// Reward settings, ADMIN only
pub async fn reward_settings(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> WebResult<Html<String>> {
    render(&RewardSettingsTemplate {
        meta: state.metadata.lookup(REWARD_SETTINGS_ROUTE),
        user: user.as_ref(),
    })
}

/// Fallback for unknown routes
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> WebResult<Response> {
    let page = render(&NotFoundTemplate {
        meta: state.metadata.default_metadata(),
        path: uri.path(),
    })?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}
