use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{NewUserRecord, UserChanges, UserRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user record {0} not found")]
    NotFound(Uuid),
    #[error("user store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

/// Document store port for the `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Every record, oldest first.
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserRecord, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
