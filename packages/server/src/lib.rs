// Lead Extraction - API Core
//
// Fetches a web page, asks an LLM to pull out the companies and people it
// mentions, and keeps every extraction run in PostgreSQL. A run younger than
// the freshness window is served from the store instead of being redone.

pub mod common;
pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod server;

pub use config::*;
pub use error::{ExtractionError, Result};
