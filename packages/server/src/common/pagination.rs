//! Offset pagination for history queries.
//!
//! History pages are small and bounded: a limit of zero, a negative limit, or
//! one above [`MAX_PAGE_SIZE`] falls back to [`MAX_PAGE_SIZE`]. A negative
//! offset is a caller error.
//!
//! ```rust,ignore
//! let page = PageRequest::new(query.limit, query.offset)?;
//! store.find(&search.with_page(page), cancel).await?;
//! ```

use crate::error::{ExtractionError, Result};

/// Largest page a history query may return.
pub const MAX_PAGE_SIZE: i64 = 10;

/// Validated limit/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Result<Self> {
        if offset < 0 {
            return Err(ExtractionError::invalid_argument(
                "offset must not be negative",
            ));
        }

        Ok(Self {
            limit: clamp_limit(limit),
            offset,
        })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Out-of-range limits fall back to the maximum page size.
pub fn clamp_limit(limit: i64) -> i64 {
    if limit <= 0 || limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    }
}
