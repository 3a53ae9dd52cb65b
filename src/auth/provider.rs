//! Identity provider port: accounts keyed by email, owning the credentials.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password;

/// Account record held by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub email_verified: bool,
    pub created_at: OffsetDateTime,
}

/// Public part of the account returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub email: String,
    pub email_verified: bool,
}

impl From<&Account> for PublicAccount {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            email_verified: a.email_verified,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("account not found")]
    AccountNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("password does not meet policy")]
    WeakPassword,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("identity backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl IdentityError {
    /// Stable machine-readable code, in the provider's `auth/...` namespace.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::InvalidEmail => "auth/invalid-email",
            IdentityError::AccountNotFound => "auth/user-not-found",
            IdentityError::WrongPassword => "auth/wrong-password",
            IdentityError::EmailAlreadyInUse => "auth/email-already-in-use",
            IdentityError::WeakPassword => "auth/weak-password",
            IdentityError::InvalidToken => "auth/invalid-token",
            IdentityError::Backend(_) => "auth/internal",
        }
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                IdentityError::EmailAlreadyInUse
            }
            _ => IdentityError::Backend(e.into()),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shared input checks for account creation and credential changes.
pub(crate) fn check_credentials(email: &str, plain: &str) -> Result<(), IdentityError> {
    if !is_valid_email(email) {
        return Err(IdentityError::InvalidEmail);
    }
    if !password::meets_policy(plain) {
        return Err(IdentityError::WeakPassword);
    }
    Ok(())
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Create an account. Email is normalized before use.
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, IdentityError>;

    /// Check credentials and return the matching account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, IdentityError>;

    async fn account(&self, id: Uuid) -> Result<Option<Account>, IdentityError>;

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError>;

    /// Change the account email. The account becomes unverified.
    async fn update_email(&self, id: Uuid, email: &str) -> Result<Account, IdentityError>;

    async fn mark_verified(&self, id: Uuid) -> Result<(), IdentityError>;

    async fn delete_account(&self, id: Uuid) -> Result<(), IdentityError>;
}
