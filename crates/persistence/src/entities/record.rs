//! Record entity (database row mapping).

use sqlx::FromRow;

use domain::models::Record;

/// Database row mapping for the records table.
#[derive(Debug, Clone, FromRow)]
pub struct RecordEntity {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub phone_number: String,
}

impl From<RecordEntity> for Record {
    fn from(entity: RecordEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            surname: entity.surname,
            age: entity.age,
            phone_number: entity.phone_number,
        }
    }
}
