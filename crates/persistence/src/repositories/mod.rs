//! Repository implementations for database operations.

pub mod record;

pub use record::RecordRepository;
