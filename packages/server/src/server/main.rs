// Main entry point for API server

use anyhow::{Context, Result};
use clap::Parser;
use leadgen_core::domains::extraction::SchemaDescriptor;
use leadgen_core::kernel::telemetry::{self, LogOutput};
use leadgen_core::kernel::{run_migrations, ServerDeps};
use leadgen_core::server::{build_app, AppState};
use leadgen_core::Config;
use tokio_util::sync::CancellationToken;

/// Lead extraction HTTP API
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    config: Config,

    /// Address to listen on
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let config = args.config;

    telemetry::init(&config.environment, LogOutput::Stdout);
    tracing::info!(environment = %config.environment, "Starting lead extraction API");

    config.validate().context("Invalid configuration")?;

    tracing::info!("Connecting to database...");
    let pool = config.connect_database().await?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let schema = SchemaDescriptor::for_extracted_entities();
    let deps = ServerDeps::production(&config, pool.clone(), schema)?;

    let shutdown = CancellationToken::new();
    let app = build_app(AppState::new(
        deps,
        shutdown.clone(),
        !config.is_production(),
    ));

    let listener = tokio::net::TcpListener::bind(&args.http_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.http_addr))?;
    tracing::info!("Listening on {}", args.http_addr);
    tracing::info!("Health check: http://{}/health", args.http_addr);

    tokio::spawn(cancel_on_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
