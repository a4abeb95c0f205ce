use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use session_guard_server::config::{AppConfig, LoggingConfig};
use session_guard_server::{build_authorizer, routes};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Cookie-session guard demo server.
#[derive(Debug, Parser)]
#[command(name = "session-guard-server", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, env = "SESSION_GUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    init_tracing(&cfg.logging);
    cfg.validate().context("invalid configuration")?;

    let authorizer = build_authorizer(&cfg).context("failed to initialize identity provider")?;
    let router = routes::build_router(&authorizer, &cfg);

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    tracing::info!(
        addr = %cfg.server.bind_addr,
        provider = ?cfg.provider.kind,
        "session guard server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down gracefully");
}

fn init_tracing(cfg: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if cfg.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
