//! Domain models for the Records API.

pub mod record;

pub use record::{CreateRecordRequest, NewRecord, Record};
