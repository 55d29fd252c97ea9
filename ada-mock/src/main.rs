//! ada-mock - ADA Media Integrity mock analysis server
//!
//! Stand-in for the real analysis backend during mobile UI development.
//! Every verdict is synthesized; no media is inspected.

use std::path::PathBuf;

use ada_common::config::{CliOverrides, ServiceConfig};
use ada_mock::session::spawn_sweeper;
use ada_mock::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for ada-mock
#[derive(Parser, Debug)]
#[command(name = "ada-mock")]
#[command(about = "Mock media-integrity analysis API for UI development")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config dir>/ada-mock/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind (overrides ADA_MOCK_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides ADA_MOCK_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upper bound on the artificial upload delay, seconds (max 2)
    #[arg(long)]
    upload_delay_cap: Option<f64>,

    /// Idle seconds before a realtime session is swept (0 disables)
    #[arg(long)]
    session_ttl: Option<u64>,

    /// Seconds between idle session sweeps
    #[arg(long)]
    sweep_interval: Option<u64>,

    /// Request body limit in bytes for uploads and chunks
    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// Seed for reproducible verdict sequences
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        CliOverrides {
            config_path: args.config,
            host: args.host,
            port: args.port,
            upload_delay_cap_secs: args.upload_delay_cap,
            session_ttl_secs: args.session_ttl,
            sweep_interval_secs: args.sweep_interval,
            max_upload_bytes: args.max_upload_bytes,
            seed: args.seed,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: CliOverrides = Args::parse().into();

    // The configured level is only known after resolution, which itself logs,
    // so start at info and reload once config is in. RUST_LOG always wins.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let (filter_layer, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| default_filter("info")));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ADA Media Integrity Mock API (ada-mock) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ServiceConfig::resolve(&cli).context("Failed to resolve configuration")?;
    if !filter_from_env {
        filter_handle
            .reload(default_filter(&config.log_level))
            .context("Failed to apply log level")?;
    }
    if let Some(seed) = config.seed {
        info!("Deterministic verdicts enabled (seed {})", seed);
    }

    let state = AppState::from_config(&config);

    match config.session_ttl() {
        Some(ttl) => {
            spawn_sweeper(state.sessions.clone(), ttl, config.sweep_interval());
            info!(
                "Idle sessions expire after {}s (sweep every {}s)",
                config.session_ttl_secs, config.sweep_interval_secs
            );
        }
        None => warn!("Session expiry disabled; abandoned sessions stay in memory"),
    }

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("ada-mock listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Filter used when RUST_LOG is not set
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "ada_mock={0},ada_common={0},tower_http={0}",
        level
    ))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
