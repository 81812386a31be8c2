pub mod dataset;
pub mod error;
pub mod species;
pub mod types;
