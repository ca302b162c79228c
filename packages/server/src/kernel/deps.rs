//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the
//! extraction actions. Every external service sits behind a trait so tests
//! can swap in mocks (see `test_dependencies`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;

use super::{
    BaseAI, BaseExtractedDataStore, BasePageFetcher, HttpPageFetcher, OpenAIAdapter,
    PostgresExtractedDataStore,
};
use crate::config::Config;
use crate::domains::extraction::{EntityExtractor, SchemaDescriptor};

/// Dependencies shared by HTTP handlers and the CLI
#[derive(Clone)]
pub struct ServerDeps {
    pub fetcher: Arc<dyn BasePageFetcher>,
    pub extractor: Arc<EntityExtractor>,
    pub store: Arc<dyn BaseExtractedDataStore>,
}

impl ServerDeps {
    pub fn new(
        fetcher: Arc<dyn BasePageFetcher>,
        extractor: Arc<EntityExtractor>,
        store: Arc<dyn BaseExtractedDataStore>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
        }
    }

    /// Production wiring: HTTP fetcher, OpenAI, PostgreSQL.
    ///
    /// `schema` is derived once by the caller at startup.
    pub fn production(config: &Config, pool: PgPool, schema: SchemaDescriptor) -> Result<Self> {
        let fetcher = HttpPageFetcher::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_page_bytes,
        )?;
        let ai: Arc<dyn BaseAI> = Arc::new(OpenAIAdapter::new(
            config.openai_secret_key.clone(),
            config.openai_base_url.clone(),
        ));

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(EntityExtractor::new(ai, schema)),
            Arc::new(PostgresExtractedDataStore::new(pool)),
        ))
    }
}
