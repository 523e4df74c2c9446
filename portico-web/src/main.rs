//! Portico Web Server
//!
//! Admin gateway: session proxy, role-gated dashboard pages and crawler
//! directives.

use clap::Parser;
use portico_core::PorticoConfig;
use portico_web::{init_logging, PorticoServerBuilder, WebResult};
use std::path::PathBuf;

/// Portico Web Server - session proxy and role-gated admin dashboard
#[derive(Parser)]
#[command(name = "portico-web")]
#[command(about = "Admin gateway for an upstream authentication API")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Upstream authentication API base URL
    #[arg(long)]
    upstream_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

/// File, then environment, then command line
fn load_config(args: &Args) -> WebResult<PorticoConfig> {
    let mut config = match &args.config {
        Some(path) => PorticoConfig::from_file(path)?,
        None => PorticoConfig::default(),
    };
    config.apply_env_overrides()?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.dev {
        config.server.dev_mode = true;
    }
    if let Some(url) = &args.upstream_url {
        config.upstream.base_url = url.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging = config.logging.with_level(level);
    }

    Ok(config)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("⚠️  Logging setup failed: {}", e);
    }

    println!("🚀 Starting Portico Web Server");
    println!("📍 Server: http://{}", config.server.address());
    println!("🔐 Upstream: {}", config.upstream.login_url());
    println!("🌐 Site: {}", config.site.base_url());
    println!("🔧 Development mode: {}", config.server.dev_mode);

    let server = match PorticoServerBuilder::with_config(config).build() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed: {}", e);
        std::process::exit(1);
    }

    println!("✅ Server shut down gracefully");
}
