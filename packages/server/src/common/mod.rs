// Common types and utilities shared across the application

pub mod cancel;
pub mod id;
pub mod pagination;

pub use cancel::with_cancel;
pub use id::ExtractedDataId;
pub use pagination::{PageRequest, MAX_PAGE_SIZE};
