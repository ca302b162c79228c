//! Test harness with testcontainers for integration testing.
//!
//! One PostgreSQL container is shared by every test in the binary.
//! The container and migrations are initialized once on first use.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use leadgen_core::common::ExtractedDataId;
use leadgen_core::kernel::{run_migrations, PostgresExtractedDataStore};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --ignored --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        run_migrations(&pool).await?;
        pool.close().await;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Fresh pool and store over the shared database.
///
/// Tests share one database, so each test should use its own urls.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// #[ignore = "requires docker"]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.store.insert(..).await.unwrap();
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub store: PostgresExtractedDataStore,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            store: PostgresExtractedDataStore::new(db_pool.clone()),
            db_pool,
        })
    }

    /// Move a stored run to `created_at` (and `updated_at`), bypassing the
    /// store, which always stamps its own clock.
    pub async fn backdate(&self, id: ExtractedDataId, created_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE extracted_data SET created_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(created_at)
            .execute(&self.db_pool)
            .await
            .context("Failed to backdate extracted_data row")?;
        Ok(())
    }

    /// A url no other test uses.
    pub fn unique_url(&self, name: &str) -> String {
        format!(
            "https://{}.example/{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default()
        )
    }
}
