//! One-shot extraction CLI
//!
//! Runs the same extract-or-reuse workflow as `POST /extract` for a single
//! URL and prints the stored record as indented JSON on stdout. Logs go to
//! stderr so the output can be piped.

use anyhow::{Context, Result};
use clap::Parser;
use leadgen_core::domains::extraction::{extract_and_persist_from_url, SchemaDescriptor};
use leadgen_core::kernel::telemetry::{self, LogOutput};
use leadgen_core::kernel::{run_migrations, ServerDeps};
use leadgen_core::Config;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Extract companies and people from a web page")]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Page to extract from
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = cli.config;

    telemetry::init(&config.environment, LogOutput::Stderr);
    config.validate().context("Invalid configuration")?;

    let pool = config.connect_database().await?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let deps = ServerDeps::production(
        &config,
        pool.clone(),
        SchemaDescriptor::for_extracted_entities(),
    )?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            on_ctrl_c.cancel();
        }
    });

    let record = extract_and_persist_from_url(&cli.url, &deps, &cancel)
        .await
        .with_context(|| format!("Failed to extract {}", cli.url))?;

    pool.close().await;

    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("Failed to encode record")?
    );

    Ok(())
}
