use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{NewUserRecord, UserChanges, UserRecord};
use super::store::{StoreError, UserStore};

/// Process-local user store. Insertion order stands in for creation time.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError> {
        let row = UserRecord {
            id: Uuid::new_v4(),
            name: record.name,
            email: record.email,
            user_id: record.user_id,
        };
        self.records.write().await.push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserRecord, StoreError> {
        let mut records = self.records.write().await;
        let row = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.name = changes.name;
        row.email = changes.email;
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
