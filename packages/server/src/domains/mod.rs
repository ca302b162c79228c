// Business domains
pub mod extraction;
