//! Application state shared by every handler

use crate::{auth::jwt::SessionSigner, upstream::UpstreamAuthClient, WebResult};
use portico_core::{
    AccessGuard, MetadataRegistry, PorticoConfig, RobotsPolicy, Role, Sitemap,
};
use std::sync::Arc;
use tracing::info;

/// Application state
///
/// Built once from the startup configuration. Everything inside is
/// immutable, so cloning per request is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Configuration
    pub config: Arc<PorticoConfig>,
    /// Client for the upstream authentication API
    pub upstream: UpstreamAuthClient,
    /// Issues and verifies the signed session cookie
    pub signer: SessionSigner,
    /// Page metadata for every route
    pub metadata: Arc<MetadataRegistry>,
    pub robots: Arc<RobotsPolicy>,
    pub sitemap: Arc<Sitemap>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: PorticoConfig) -> WebResult<Self> {
        let upstream = UpstreamAuthClient::new(config.upstream.clone())?;
        let signer = SessionSigner::new(&config.session);
        let base_url = config.site.base_url();

        info!(
            upstream = %upstream.login_url(),
            site = %base_url,
            policy = ?config.guard.unauthenticated,
            "Application state initialized"
        );

        Ok(Self {
            metadata: Arc::new(MetadataRegistry::new(&config.site)),
            robots: Arc::new(RobotsPolicy::for_base_url(base_url)),
            sitemap: Arc::new(Sitemap::for_base_url(base_url)),
            upstream,
            signer,
            config: Arc::new(config),
        })
    }

    /// Access guard for a page, `None` admitting any signed-in user
    pub fn access_guard(&self, required: Option<Role>) -> AccessGuard {
        let guard = match required {
            Some(role) => AccessGuard::require_role(role),
            None => AccessGuard::authenticated(),
        };
        guard.with_unauthenticated(self.config.guard.unauthenticated)
    }
}
