//! Extraction domain actions - business logic functions
//!
//! Actions take the server dependencies and the caller's cancellation token;
//! HTTP handlers and the CLI are thin wrappers around them.

mod extract;
mod history;

pub use extract::{extract_and_persist_from_url, get_extracted_data};
pub use history::{get_extracted_data_history, HistoryQuery};
