//! Tracker service entry point.
//!
//! Initializes tracing, resolves configuration from the command line, the
//! `PORT` environment variable and an optional TOML file, then serves the
//! liveness router until SIGTERM/SIGINT.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracker::config::{AppConfig, LogFormat, Overrides, DEFAULT_LOG_FILTER, PORT_ENV_VAR};
use tracker::create_router;
use tracker::http::start_server;

/// Tracker: HTTP liveness service
#[derive(Parser, Debug)]
#[command(name = "tracker", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level filter (e.g., "tracker=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let port_env = std::env::var(PORT_ENV_VAR).ok();
    let overrides = Overrides {
        host: args.host,
        port: args.port,
        log_format: args.log_format,
    };
    let config = AppConfig::resolve(args.config.as_deref(), port_env.as_deref(), overrides);

    // Logging comes up before config errors are reported, so fall back to the
    // CLI format (or text) when the config itself failed.
    let log_format = match &config {
        Ok(config) => config.logging.format,
        Err(_) => args.log_format.unwrap_or_default(),
    };
    init_tracing(args.log_level, log_format);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        format = ?config.logging.format,
        "Loaded configuration"
    );

    let app = create_router();

    match start_server(app, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with priority: CLI > env > default
fn init_tracing(cli_filter: Option<String>, format: LogFormat) {
    let log_filter = cli_filter
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
