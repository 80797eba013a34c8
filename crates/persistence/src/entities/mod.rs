//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod record;

pub use record::RecordEntity;
