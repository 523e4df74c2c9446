//! Configuration management
//!
//! Everything environment-derived is read once at startup into a
//! [`PorticoConfig`] and passed down explicitly from there.

use crate::access::UnauthenticatedPolicy;
use crate::error::{ErrorContext, PorticoError, PorticoResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Shortest session secret accepted outside development mode
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

const DEV_SESSION_SECRET: &str = "portico-development-secret-change-me";

/// Complete gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PorticoConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub session: SessionConfig,
    pub site: SiteConfig,
    pub guard: GuardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            dev_mode: false,
        }
    }
}

impl ServerConfig {
    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream authentication API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub login_path: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first one, for transient failures only
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            login_path: "/api/auth/login".to_string(),
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

impl UpstreamConfig {
    pub fn login_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.login_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(1u64 << attempt.min(16)))
    }
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC secret for the signed session cookie
    pub secret: String,
    pub ttl_secs: u64,
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SESSION_SECRET.to_string(),
            ttl_secs: 8 * 60 * 60,
            secure_cookies: false,
        }
    }
}

impl SessionConfig {
    /// Session lifetime in seconds, capped at [`MAX_SESSION_TTL_SECS`]
    pub fn effective_ttl_secs(&self) -> i64 {
        self.ttl_secs.min(MAX_SESSION_TTL_SECS) as i64
    }
}

/// Public site identity, used for metadata, robots and sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub app_url: String,
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
            name: "Portico".to_string(),
        }
    }
}

impl SiteConfig {
    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }

    /// Absolute URL for a site path
    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub unauthenticated: UnauthenticatedPolicy,
}

impl PorticoConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> PorticoResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PorticoError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        toml::from_str(&content).map_err(|e| PorticoError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PorticoResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| PorticoError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| PorticoError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> PorticoResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> PorticoResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PORTICO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORTICO_PORT") {
            self.server.port = port.parse().map_err(|e| PorticoError::Config {
                message: format!("PORTICO_PORT is not a valid port: {}", port),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config").with_operation("env_override"),
            })?;
        }
        if let Some(dev_mode) = lookup("PORTICO_DEV_MODE") {
            self.server.dev_mode = matches!(dev_mode.as_str(), "1" | "true" | "yes");
        }
        if let Some(url) = lookup("PORTICO_UPSTREAM_URL") {
            self.upstream.base_url = url;
        }
        if let Some(secret) = lookup("PORTICO_SESSION_SECRET") {
            self.session.secret = secret;
        }
        if let Some(app_url) = lookup("PORTICO_APP_URL").or_else(|| lookup("NEXT_PUBLIC_APP_URL")) {
            self.site.app_url = app_url;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> PorticoResult<()> {
        if self.server.host.is_empty() {
            return Err(invalid("Server host cannot be empty", "server.host"));
        }

        if self.server.port == 0 {
            return Err(invalid("Server port must be greater than 0", "server.port"));
        }

        check_http_url(&self.upstream.base_url, "upstream.base_url")?;
        check_http_url(&self.site.app_url, "site.app_url")?;

        if self.upstream.timeout_secs == 0 {
            return Err(invalid(
                "Upstream timeout must be greater than 0",
                "upstream.timeout_secs",
            ));
        }

        if self.session.ttl_secs == 0 || self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(invalid(
                "Session TTL must be between 1 second and one year",
                "session.ttl_secs",
            ));
        }

        if !self.server.dev_mode
            && (self.session.secret.len() < MIN_SECRET_LEN
                || self.session.secret == DEV_SESSION_SECRET)
        {
            return Err(PorticoError::Config {
                message: format!(
                    "Session secret must be a private value of at least {} bytes",
                    MIN_SECRET_LEN
                ),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_metadata("field", "session.secret")
                    .with_suggestion("Set PORTICO_SESSION_SECRET or enable dev mode"),
            });
        }

        Ok(())
    }
}

fn invalid(message: &str, field: &str) -> PorticoError {
    PorticoError::Config {
        message: message.to_string(),
        source: None,
        context: ErrorContext::new("config")
            .with_operation("validate")
            .with_metadata("field", field),
    }
}

fn check_http_url(value: &str, field: &str) -> PorticoResult<()> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(invalid(
            &format!("{} must use http or https, got {}", field, parsed.scheme()),
            field,
        )),
        Err(e) => Err(PorticoError::Config {
            message: format!("{} is not a valid URL: {}", field, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("validate")
                .with_metadata("field", field),
        }),
    }
}
