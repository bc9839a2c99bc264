use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::{env, net::SocketAddr};
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use history_server::{create_app, logging::ColoredFormatter, HistoryConfig, HistoryServer};

/// Tracker History HTTP Server
#[derive(Parser, Debug)]
#[command(name = "history-server")]
#[command(about = "Read-only change history API for project tracker entities")]
struct Args {
    /// Server bind address (overrides the configuration file)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides the configuration file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, default_value = "history-server.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose);

    let mut config = HistoryConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("📜 {}", format!("Starting {}", config.server.name).bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;

    let server = HistoryServer::new(config).await?;
    info!(
        backend = %server.backend,
        kinds = server.endpoints().len(),
        "History endpoints ready"
    );

    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("🚀 {}", format!("History server running on http://{addr}").bright_green());
    info!("📋 {}", format!("Health check available at: http://{addr}/health").bright_blue());
    info!("📋 {}", format!("History API available at: http://{addr}/api/v1/history").bright_blue());
    info!("📖 {}", format!("API docs available at: http://{addr}/docs").bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("👋 {}", "History server stopped".bright_yellow());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    // Development unless HISTORY_ENV says otherwise
    let is_development = env::var("HISTORY_ENV").unwrap_or_else(|_| "development".to_string()) == "development";
    let use_colors = env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("history_server={level},tower_http=info,sqlx=warn").into());

    if is_development && use_colors {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(true)
                    .event_format(ColoredFormatter),
            )
            .init();

        print_startup_banner();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .init();
    }
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                     📜 TRACKER HISTORY API                   ║".bright_cyan());
    println!("{}", "║        User stories · Tasks · Issues · Wiki pages            ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
