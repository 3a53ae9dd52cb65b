use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::password::{hash_password, meets_policy, verify_password};
use super::provider::{
    check_credentials, is_valid_email, normalize_email, Account, IdentityError, IdentityProvider,
};

/// Process-local identity provider, used by tests and `BACKEND=memory`.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = normalize_email(email);
        self.accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let email = normalize_email(email);
        check_credentials(&email, password)?;
        let hash = hash_password(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == email) {
            return Err(IdentityError::EmailAlreadyInUse);
        }
        let account = Account {
            id: Uuid::new_v4(),
            email,
            password_hash: hash,
            email_verified: false,
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.insert(account.id, account.clone());
        info!(account_id = %account.id, email = %account.email, "account created");
        Ok(account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }
        let account = self
            .find_by_email(&email)
            .await
            .ok_or(IdentityError::AccountNotFound)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(IdentityError::WrongPassword);
        }
        Ok(account)
    }

    async fn account(&self, id: Uuid) -> Result<Option<Account>, IdentityError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError> {
        if !meets_policy(password) {
            return Err(IdentityError::WeakPassword);
        }
        let hash = hash_password(password)?;
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(IdentityError::AccountNotFound)?;
        account.password_hash = hash;
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<Account, IdentityError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == email && a.id != id) {
            return Err(IdentityError::EmailAlreadyInUse);
        }
        let account = accounts.get_mut(&id).ok_or(IdentityError::AccountNotFound)?;
        account.email = email;
        account.email_verified = false;
        Ok(account.clone())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(IdentityError::AccountNotFound)?;
        account.email_verified = true;
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), IdentityError> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(IdentityError::AccountNotFound)
    }
}
