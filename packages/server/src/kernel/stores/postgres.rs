//! PostgreSQL storage for extraction runs.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::common::{with_cancel, ExtractedDataId};
use crate::domains::extraction::{
    ExtractedData, ExtractedDataSearch, ExtractedEntities, NewExtractedData,
};
use crate::error::{ExtractionError, Result};
use crate::kernel::{BaseExtractedDataStore, PoolStats};

/// Ping queries give up after this long.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Extraction runs stored in the `extracted_data` table.
#[derive(Clone)]
pub struct PostgresExtractedDataStore {
    pool: PgPool,
}

impl PostgresExtractedDataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseExtractedDataStore for PostgresExtractedDataStore {
    async fn insert(
        &self,
        new: &NewExtractedData,
        cancel: &CancellationToken,
    ) -> Result<ExtractedData> {
        with_cancel(cancel, ExtractedData::insert(new, &self.pool)).await
    }

    async fn get_last_by_url(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        with_cancel(cancel, ExtractedData::find_latest_by_url(url, &self.pool)).await
    }

    async fn find(
        &self,
        search: &ExtractedDataSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExtractedData>> {
        with_cancel(cancel, ExtractedData::search(search, &self.pool)).await
    }

    async fn get_by_id(
        &self,
        id: ExtractedDataId,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        with_cancel(cancel, ExtractedData::find_by_id(id, &self.pool)).await
    }

    async fn update_by_id(
        &self,
        id: ExtractedDataId,
        entities: &ExtractedEntities,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        with_cancel(cancel, ExtractedData::update_entities(id, entities, &self.pool)).await
    }

    async fn ping(&self, cancel: &CancellationToken) -> Result<()> {
        with_cancel(cancel, async {
            tokio::time::timeout(
                PING_TIMEOUT,
                sqlx::query("SELECT 1").execute(&self.pool),
            )
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;
            Ok::<(), ExtractionError>(())
        })
        .await
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        })
    }
}
