//! Access guard
//!
//! Decides, per request, whether a page renders or the visitor is sent
//! elsewhere. The decision is recomputed on every call.

use crate::types::{Role, User};
use serde::{Deserialize, Serialize};

/// Default route for users whose role does not match
pub const DEFAULT_FALLBACK_PATH: &str = "/dashboard";
/// Default login page
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// What to do with a request that carries no session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthenticatedPolicy {
    /// Send the visitor to the login page
    #[default]
    RedirectToLogin,
    /// Render the page shell anyway
    Allow,
}

/// Outcome of evaluating a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Render,
    RedirectToLogin,
    RedirectToFallback,
}

impl AccessDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, AccessDecision::Render)
    }
}

/// Per-page authorization check
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// Role a user must hold; `None` admits any signed-in user
    pub required: Option<Role>,
    pub fallback: String,
    pub login_path: String,
    pub unauthenticated: UnauthenticatedPolicy,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self {
            required: None,
            fallback: DEFAULT_FALLBACK_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthenticated: UnauthenticatedPolicy::default(),
        }
    }
}

impl AccessGuard {
    /// Guard admitting any authenticated user
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Guard admitting only users holding `role`
    pub fn require_role(role: Role) -> Self {
        Self {
            required: Some(role),
            ..Self::default()
        }
    }

    pub fn with_unauthenticated(mut self, policy: UnauthenticatedPolicy) -> Self {
        self.unauthenticated = policy;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn evaluate(&self, user: Option<&User>) -> AccessDecision {
        match (user, &self.required) {
            (None, _) => match self.unauthenticated {
                UnauthenticatedPolicy::RedirectToLogin => AccessDecision::RedirectToLogin,
                UnauthenticatedPolicy::Allow => AccessDecision::Render,
            },
            (Some(user), Some(required)) if !user.has_role(required) => {
                AccessDecision::RedirectToFallback
            }
            (Some(_), _) => AccessDecision::Render,
        }
    }

    /// Where to send the visitor, `None` when the page should render.
    ///
    /// Login redirects carry the requested path in `next`.
    pub fn redirect_target(&self, decision: AccessDecision, requested: &str) -> Option<String> {
        match decision {
            AccessDecision::Render => None,
            AccessDecision::RedirectToFallback => Some(self.fallback.clone()),
            AccessDecision::RedirectToLogin => Some(format!(
                "{}?next={}",
                self.login_path,
                urlencoding::encode(requested)
            )),
        }
    }
}
