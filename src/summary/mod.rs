//! Review-table aggregation.
//!
//! The engine builds the rows; `keys` turns them into backend payloads.

pub mod engine;
pub mod keys;

pub use engine::*;
pub use keys::*;
