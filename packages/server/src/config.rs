use anyhow::{ensure, Context, Result};
use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::time::Duration;

use crate::kernel::DEFAULT_MAX_PAGE_BYTES;

/// Application configuration, from flags with environment fallback.
///
/// Binaries load `.env` (if present) before parsing so it feeds the
/// environment fallbacks.
#[derive(Clone, Args)]
pub struct Config {
    /// Deployment environment (develop, stage, prod)
    #[arg(long, env = "ENVIRONMENT", default_value = "develop")]
    pub environment: String,

    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    #[arg(long, env = "POSTGRES_DATABASE", default_value = "hunterio")]
    pub postgres_database: String,

    #[arg(long, env = "POSTGRES_USER", default_value = "hunterio")]
    pub postgres_user: String,

    #[arg(
        long,
        env = "POSTGRES_PASSWORD",
        default_value = "hunterio",
        hide_env_values = true
    )]
    pub postgres_password: String,

    #[arg(long, env = "POSTGRES_MAX_CONNECTIONS", default_value_t = 2)]
    pub postgres_max_connections: u32,

    /// API key for the completion service (required)
    #[arg(long, env = "OPENAI_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub openai_secret_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = openai_client::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Page fetch timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Largest page body accepted, in bytes
    #[arg(long, env = "MAX_PAGE_BYTES", default_value_t = DEFAULT_MAX_PAGE_BYTES)]
    pub max_page_bytes: usize,
}

impl Config {
    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.openai_secret_key.trim().is_empty(),
            "OPENAI_SECRET_KEY must be set"
        );
        ensure!(self.fetch_timeout_secs > 0, "FETCH_TIMEOUT_SECS must be positive");
        ensure!(self.max_page_bytes > 0, "MAX_PAGE_BYTES must be positive");
        ensure!(
            self.postgres_max_connections > 0,
            "POSTGRES_MAX_CONNECTIONS must be positive"
        );
        Ok(())
    }

    /// Production hides internal error details from clients.
    pub fn is_production(&self) -> bool {
        self.environment == "prod"
    }

    pub fn pg_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.postgres_host)
            .port(self.postgres_port)
            .database(&self.postgres_database)
            .username(&self.postgres_user)
            .password(&self.postgres_password)
            .ssl_mode(PgSslMode::Disable)
    }

    pub async fn connect_database(&self) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.postgres_max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(self.pg_connect_options())
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to PostgreSQL at {}:{}/{}",
                    self.postgres_host, self.postgres_port, self.postgres_database
                )
            })
    }
}
