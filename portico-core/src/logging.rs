//! Logging setup
//!
//! Structured logging through `tracing`, with a configurable output format.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Whether to include thread information
    pub include_thread: bool,
    /// Custom filter directives
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            include_location: false,
            include_thread: false,
            filter_directives: vec![
                "portico_core=info".to_string(),
                "portico_web=info".to_string(),
                "tower_http=info".to_string(),
            ],
        }
    }
}

impl LoggingConfig {
    /// Replace the level of the portico crates, keeping other directives
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self.filter_directives = vec![
            format!("portico_core={level}"),
            format!("portico_web={level}"),
            "tower_http=info".to_string(),
        ];
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        self.filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
    }

    /// `rust_log`, when set, replaces both `level` and `filter_directives`
    fn filter_from(
        &self,
        rust_log: Option<&str>,
    ) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
            return Ok(EnvFilter::try_new(directives)?);
        }

        let mut filter = EnvFilter::try_new(&self.level)?;
        for directive in &self.filter_directives {
            filter = filter.add_directive(directive.parse()?);
        }

        Ok(filter)
    }
}

/// Initialize the global subscriber
///
/// A non-empty `RUST_LOG` takes precedence over the whole config filter.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .with_thread_ids(config.include_thread)
                    .with_thread_names(config.include_thread),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .with_thread_ids(config.include_thread)
                    .with_thread_names(config.include_thread),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location)
                    .with_thread_ids(config.include_thread)
                    .with_thread_names(config.include_thread),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let config = LoggingConfig::default();
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_rust_log_overrides_crate_directives() {
        let config = LoggingConfig::default();

        let filter = config.filter_from(Some("portico_web=debug")).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("portico_web=debug"));
        assert!(!rendered.contains("portico_web=info"));

        let filter = config.filter_from(Some("  ")).unwrap();
        assert!(filter.to_string().contains("portico_web=info"));
    }

    #[test]
    fn test_with_level_rewrites_crate_directives() {
        let config = LoggingConfig::default().with_level("debug");
        assert_eq!(config.level, "debug");
        assert!(config
            .filter_directives
            .contains(&"portico_web=debug".to_string()));
    }
}
