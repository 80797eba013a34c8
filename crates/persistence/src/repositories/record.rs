//! Record repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::{NewRecord, Record};
use domain::services::{RecordStore, RecordStoreError};

use crate::entities::RecordEntity;
use crate::metrics::QueryTimer;

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    /// Creates a new RecordRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    async fn insert(&self, record: NewRecord) -> Result<Record, RecordStoreError> {
        let timer = QueryTimer::new("insert_record");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            INSERT INTO records (name, surname, age, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, surname, age, phone_number
            "#,
        )
        .bind(&record.name)
        .bind(&record.surname)
        .bind(record.age)
        .bind(&record.phone_number)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Record>, RecordStoreError> {
        let timer = QueryTimer::new("find_record_by_id");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            SELECT id, name, surname, age, phone_number FROM records WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Record::from))
    }

    async fn list_all(&self) -> Result<Vec<Record>, RecordStoreError> {
        // No ORDER BY: exports follow the table's natural order.
        let timer = QueryTimer::new("list_records");
        let result = sqlx::query_as::<_, RecordEntity>(
            r#"
            SELECT id, name, surname, age, phone_number FROM records
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let records = result?.into_iter().map(Record::from).collect::<Vec<_>>();
        tracing::debug!(count = records.len(), "Listed records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_is_a_shareable_store() {
        // Database round trips live in tests/record_repository_integration.rs
        fn assert_store<T: RecordStore + Clone + 'static>() {}
        assert_store::<RecordRepository>();
    }
}
