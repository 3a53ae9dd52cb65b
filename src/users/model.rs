use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A document in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Identity account this record belongs to. Fixed at creation.
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub user_id: Uuid,
}

/// Fields an update may touch. The account link is not one of them.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
}
