//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod page_fetcher;
pub mod stores;
pub mod telemetry;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIAdapter;
pub use deps::ServerDeps;
pub use page_fetcher::{HttpPageFetcher, DEFAULT_MAX_PAGE_BYTES};
pub use stores::{run_migrations, MemoryExtractedDataStore, PostgresExtractedDataStore};
pub use test_dependencies::TestDependencies;
pub use traits::*;
