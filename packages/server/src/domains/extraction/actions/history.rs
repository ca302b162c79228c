use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::common::PageRequest;
use crate::domains::extraction::models::{ExtractedData, ExtractedDataSearch};
use crate::error::{ExtractionError, Result};
use crate::kernel::ServerDeps;

/// History request, as accepted by `POST /extract/history`.
///
/// Missing fields take their zero value: empty url, unset dates, limit and
/// offset of zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub url: String,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

/// Past runs matching `query`, newest first.
///
/// Both date bounds must be set. The limit falls back to the maximum page
/// size when it is zero or too large.
pub async fn get_extracted_data_history(
    query: HistoryQuery,
    deps: &ServerDeps,
    cancel: &CancellationToken,
) -> Result<Vec<ExtractedData>> {
    let created_at_from = non_zero(query.created_at_from)
        .ok_or_else(|| ExtractionError::invalid_argument("created_at_from must be set"))?;
    let created_at_to = non_zero(query.created_at_to)
        .ok_or_else(|| ExtractionError::invalid_argument("created_at_to must be set"))?;
    let page = PageRequest::new(query.limit, query.offset)?;

    let search = ExtractedDataSearch {
        url: query.url,
        created_at_from: Some(created_at_from),
        created_at_to: Some(created_at_to),
        ..Default::default()
    }
    .with_page(page);

    let records = deps.store.find(&search, cancel).await?;
    debug!(
        url = %search.url,
        limit = page.limit(),
        offset = page.offset(),
        results = records.len(),
        "History query"
    );

    Ok(records)
}

/// `0001-01-01T00:00:00Z` is what clients send for an unset timestamp.
fn zero_time() -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn non_zero(value: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    value.filter(|v| Some(*v) != zero_time())
}
