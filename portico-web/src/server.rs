//! Portico Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use portico_core::PorticoConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Portico web server
pub struct PorticoServer {
    config: PorticoConfig,
    state: AppState,
}

impl PorticoServer {
    /// Create a new Portico server
    pub fn new(config: PorticoConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone())?;

        Ok(Self { config, state })
    }

    /// Start the web server, returning after a graceful shutdown
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.server.address();

        info!("🚀 Starting Portico Web Server");
        info!("📍 Server address: http://{}", address);
        info!("🔐 Upstream login: {}", self.state.upstream.login_url());
        info!("🔧 Development mode: {}", self.config.server.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &PorticoConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for PorticoServer
pub struct PorticoServerBuilder {
    config: PorticoConfig,
}

impl PorticoServerBuilder {
    /// Create a new server builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PorticoConfig::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn with_config(config: PorticoConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.server.dev_mode = dev_mode;
        self
    }

    /// Set the upstream authentication API base URL
    pub fn upstream_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.upstream.base_url = url.into();
        self
    }

    /// Set the public site URL
    pub fn app_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.site.app_url = url.into();
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<PorticoServer> {
        PorticoServer::new(self.config)
    }
}

impl Default for PorticoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation_in_dev_mode() {
        let server = PorticoServerBuilder::new().dev_mode(true).build();
        assert!(server.is_ok());
    }

    #[test]
    fn test_default_secret_rejected_outside_dev_mode() {
        let server = PorticoServerBuilder::new().build();
        assert!(matches!(server, Err(WebError::Core(_))));
    }

    #[test]
    fn test_server_builder() {
        let builder = PorticoServerBuilder::new()
            .host("localhost")
            .port(4000)
            .dev_mode(true)
            .upstream_url("http://auth.internal:8000")
            .app_url("https://admin.example.com");

        assert_eq!(builder.config.server.host, "localhost");
        assert_eq!(builder.config.server.port, 4000);
        assert!(builder.config.server.dev_mode);
        assert_eq!(builder.config.upstream.base_url, "http://auth.internal:8000");
        assert_eq!(builder.config.site.app_url, "https://admin.example.com");
    }
}
