//! Identifier for persisted extraction records.
//!
//! Records are keyed by a `BIGSERIAL`, so the id is a transparent `i64`
//! newtype. It encodes to the database and to JSON as a bare integer.
//!
//! Zero is never assigned by the database and is treated as "no id" by
//! lookups and updates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database-assigned id of an extraction record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ExtractedDataId(i64);

impl ExtractedDataId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Ids are strictly positive; zero and negatives are never assigned.
    pub const fn is_unset(self) -> bool {
        self.0 <= 0
    }
}

impl From<i64> for ExtractedDataId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExtractedDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExtractedDataId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
