// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The extract-or-reuse workflow lives in domains::extraction::actions and
// only talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BasePageFetcher)
//
// Every method takes the caller's CancellationToken and must return
// ExtractionError::Cancelled promptly once it fires.

use async_trait::async_trait;
use openai_client::{ChatCompletion, ChatRequest};
use tokio_util::sync::CancellationToken;

use crate::common::ExtractedDataId;
use crate::domains::extraction::{
    ExtractedData, ExtractedDataSearch, ExtractedEntities, NewExtractedData,
};
use crate::error::Result;

// =============================================================================
// Page Fetcher Trait (Infrastructure - retrieve page text)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// GET `url` and return the body as text.
    ///
    /// 404 maps to `PageNotFound`; transport failures and any other non-200
    /// status map to `ServiceUnavailable`.
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<String>;
}

// =============================================================================
// AI Trait (Infrastructure - chat completions)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Send a chat completion request and return the raw completion.
    ///
    /// An empty `choices` list is returned as-is; callers decide what it means.
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletion>;
}

// =============================================================================
// Extracted Data Store Trait (Infrastructure - persistence)
// =============================================================================

/// Connection pool statistics reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

#[async_trait]
pub trait BaseExtractedDataStore: Send + Sync {
    /// Persist a new run. The store assigns the id and stamps `created_at`
    /// (and `updated_at`) with its own clock at insert time.
    async fn insert(
        &self,
        new: &NewExtractedData,
        cancel: &CancellationToken,
    ) -> Result<ExtractedData>;

    /// Most recent run for `url`; `Ok(None)` when the url was never extracted.
    async fn get_last_by_url(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>>;

    /// Runs matching `search`, newest first.
    async fn find(
        &self,
        search: &ExtractedDataSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExtractedData>>;

    /// Run by id; `Ok(None)` when absent. An unset id is `InvalidArgument`.
    async fn get_by_id(
        &self,
        id: ExtractedDataId,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>>;

    /// Replace the entities of a run and stamp `updated_at`; `Ok(None)` when
    /// absent. Not reached by the extraction workflow, which never rewrites a
    /// run.
    async fn update_by_id(
        &self,
        id: ExtractedDataId,
        entities: &ExtractedEntities,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>>;

    /// Cheap liveness probe.
    async fn ping(&self, cancel: &CancellationToken) -> Result<()>;

    /// Pool statistics, when the store is backed by a pool.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
