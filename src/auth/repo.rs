use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::password::{hash_password, meets_policy, verify_password};
use super::provider::{
    check_credentials, is_valid_email, normalize_email, Account, IdentityError, IdentityProvider,
};

/// Identity provider backed by the `accounts` table.
#[derive(Clone)]
pub struct PgIdentityProvider {
    db: PgPool,
}

impl PgIdentityProvider {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, email_verified, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let email = normalize_email(email);
        check_credentials(&email, password)?;
        let hash = hash_password(password)?;

        // unique violation on email maps to EmailAlreadyInUse
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, email_verified, created_at
            "#,
        )
        .bind(&email)
        .bind(&hash)
        .fetch_one(&self.db)
        .await?;
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
            .await?
            .ok_or(IdentityError::AccountNotFound)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(IdentityError::WrongPassword);
        }
        Ok(account)
    }

    async fn account(&self, id: Uuid) -> Result<Option<Account>, IdentityError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, email_verified, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError> {
        if !meets_policy(password) {
            return Err(IdentityError::WeakPassword);
        }
        let hash = hash_password(password)?;
        let res = sqlx::query(r#"UPDATE accounts SET password_hash = $1 WHERE id = $2"#)
            .bind(&hash)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(IdentityError::AccountNotFound);
        }
        debug!(account_id = %id, "password updated");
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<Account, IdentityError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(IdentityError::InvalidEmail);
        }
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
               SET email = $1, email_verified = FALSE
             WHERE id = $2
            RETURNING id, email, password_hash, email_verified, created_at
            "#,
        )
        .bind(&email)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(IdentityError::AccountNotFound)?;
        debug!(account_id = %id, email = %account.email, "email updated");
        Ok(account)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), IdentityError> {
        let res = sqlx::query(r#"UPDATE accounts SET email_verified = TRUE WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(IdentityError::AccountNotFound);
        }
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), IdentityError> {
        let res = sqlx::query(r#"DELETE FROM accounts WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(IdentityError::AccountNotFound);
        }
        info!(account_id = %id, "account deleted");
        Ok(())
    }
}
