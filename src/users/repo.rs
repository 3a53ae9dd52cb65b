use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::model::{NewUserRecord, UserChanges, UserRecord};
use super::store::{StoreError, UserStore};

/// User store backed by the `user_records` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, user_id
            FROM user_records
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO user_records (name, email, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, user_id
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(record.user_id)
        .fetch_one(&self.db)
        .await?;
        debug!(id = %row.id, user_id = %row.user_id, "user record created");
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, name, email, user_id FROM user_records WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE user_records
               SET name = $1, email = $2
             WHERE id = $3
            RETURNING id, name, email, user_id
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let res = sqlx::query(r#"DELETE FROM user_records WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(%id, "user record deleted");
        Ok(())
    }
}
