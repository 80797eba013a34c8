//! Record store abstraction.
//!
//! The API layer talks to persistence only through [`RecordStore`]; the
//! PostgreSQL implementation lives in the `persistence` crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewRecord, Record};

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations over the single `Record` entity.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record and returns it with its newly assigned identifier.
    async fn insert(&self, record: NewRecord) -> Result<Record, RecordStoreError>;

    /// Looks up a record by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Record>, RecordStoreError>;

    /// Returns every stored record in the store's natural retrieval order.
    async fn list_all(&self) -> Result<Vec<Record>, RecordStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err: RecordStoreError = sqlx::Error::PoolTimedOut.into();
        assert!(err.to_string().starts_with("Database error:"));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_record_store_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn RecordStore>) {}
        assert_object_safe(None);
    }
}
