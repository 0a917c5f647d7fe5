//! Guild member data: the record model, dataset loading and lookups
pub mod dataset;
pub mod error;
pub mod model;
pub mod query;
