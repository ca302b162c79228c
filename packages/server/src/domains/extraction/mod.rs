//! Extraction domain - companies and people pulled from web pages
//!
//! # Flow
//!
//! ```text
//! url → store.get_last_by_url ─fresh─→ cached record
//!              │
//!              └─stale/missing─→ fetcher.fetch → extractor.extract → store.insert
//! ```
//!
//! Every extraction run is kept as a new row, so the history of a URL is the
//! list of its runs, newest first.
//!
//! # Components
//!
//! - `models`: Company, Person, Contact and the persisted `ExtractedData` record
//! - `schema`: the structured-output schema, derived once at startup
//! - `extractor`: prompt building and completion parsing
//! - `freshness`: the cache window check
//! - `actions`: extract-or-reuse and history queries

pub mod actions;
pub mod extractor;
pub mod freshness;
pub mod models;
pub mod schema;

pub use actions::{
    extract_and_persist_from_url, get_extracted_data, get_extracted_data_history, HistoryQuery,
};
pub use extractor::{EntityExtractor, EXTRACTION_MODEL};
pub use freshness::{is_fresh, FRESHNESS_WINDOW_SECS};
pub use models::{
    Company, Contact, ExtractedData, ExtractedDataSearch, ExtractedEntities, NewExtractedData,
    Person,
};
pub use schema::SchemaDescriptor;
