use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::common::ExtractedDataId;
use crate::domains::extraction::freshness::is_fresh;
use crate::domains::extraction::models::{ExtractedData, NewExtractedData};
use crate::error::{ExtractionError, Result};
use crate::kernel::ServerDeps;

/// Return a fresh extraction run for `url`, creating one if needed.
///
/// A run younger than the freshness window is returned as-is. Otherwise the
/// page is fetched, sent through the extractor and the result is inserted as
/// a new run; older runs are never modified.
///
/// Any failure stops the chain: nothing is written unless fetch and
/// extraction both succeed.
pub async fn extract_and_persist_from_url(
    url: &str,
    deps: &ServerDeps,
    cancel: &CancellationToken,
) -> Result<ExtractedData> {
    if url.trim().is_empty() {
        return Err(ExtractionError::invalid_argument("url must not be empty"));
    }

    if let Some(cached) = deps.store.get_last_by_url(url, cancel).await? {
        if is_fresh(cached.created_at, Utc::now()) {
            info!(url = %url, record_id = %cached.id, cache = "hit", "Reusing fresh extraction");
            return Ok(cached);
        }
        debug!(
            url = %url,
            record_id = %cached.id,
            created_at = %cached.created_at,
            "Cached extraction is stale"
        );
    }

    let page = deps.fetcher.fetch(url, cancel).await?;

    let entities = deps.extractor.extract(&page, cancel).await?;

    let record = deps
        .store
        .insert(&NewExtractedData::from_entities(url, entities), cancel)
        .await?;

    info!(
        url = %url,
        record_id = %record.id,
        cache = "miss",
        companies = record.companies.len(),
        people = record.people.len(),
        "Stored new extraction"
    );

    Ok(record)
}

/// Look up a single run by id.
pub async fn get_extracted_data(
    id: ExtractedDataId,
    deps: &ServerDeps,
    cancel: &CancellationToken,
) -> Result<Option<ExtractedData>> {
    deps.store.get_by_id(id, cancel).await
}
