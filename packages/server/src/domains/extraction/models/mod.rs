pub mod company;
pub mod extracted_data;
pub mod person;

pub use company::Company;
pub use extracted_data::{ExtractedData, ExtractedDataSearch, ExtractedEntities, NewExtractedData};
pub use person::{Contact, Person};
