//! General utilities
pub mod string;
pub mod tri;
