//! Cache window for extraction runs.

use chrono::{DateTime, Duration, Utc};

/// How long an extraction run is reused before the page is extracted again.
pub const FRESHNESS_WINDOW_SECS: i64 = 60 * 60;

pub fn freshness_window() -> Duration {
    Duration::seconds(FRESHNESS_WINDOW_SECS)
}

/// A run is fresh while it is strictly younger than the window.
///
/// A run created exactly one window ago is stale.
pub fn is_fresh(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    created_at > now - freshness_window()
}
