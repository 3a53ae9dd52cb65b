use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::IdentityError;
use crate::users::StoreError;

pub const EMPTY_CREDENTIALS: &str = "email and password are required";
pub const EMPTY_EMAIL: &str = "email is required";
pub const PASSWORD_LENGTH: &str = "password must be between 8 and 14 characters";

#[derive(Debug, Error)]
pub enum HomeError {
    /// Rejected before any backend call.
    #[error("{0}")]
    Validation(&'static str),
    #[error("user record {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for HomeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => HomeError::NotFound(id),
            other => HomeError::Store(other),
        }
    }
}

/// Message shown to the operator for a provider failure.
pub fn identity_message(e: &IdentityError) -> &'static str {
    match e {
        IdentityError::EmailAlreadyInUse => "email already in use",
        IdentityError::InvalidEmail => "invalid email",
        IdentityError::WeakPassword => PASSWORD_LENGTH,
        IdentityError::AccountNotFound => "linked account not found",
        IdentityError::WrongPassword => "incorrect password",
        IdentityError::InvalidToken => "invalid or expired token",
        IdentityError::Backend(_) => "identity provider unavailable",
    }
}

impl HomeError {
    pub fn user_message(&self) -> String {
        match self {
            HomeError::Validation(msg) => (*msg).to_string(),
            HomeError::NotFound(_) => "user not found".to_string(),
            HomeError::Identity(e) => identity_message(e).to_string(),
            HomeError::Store(_) => "user store unavailable".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HomeError::Validation(_) => StatusCode::BAD_REQUEST,
            HomeError::NotFound(_) => StatusCode::NOT_FOUND,
            HomeError::Identity(IdentityError::EmailAlreadyInUse) => StatusCode::CONFLICT,
            HomeError::Identity(IdentityError::InvalidEmail)
            | HomeError::Identity(IdentityError::WeakPassword) => StatusCode::BAD_REQUEST,
            HomeError::Identity(_) | HomeError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HomeError> for (StatusCode, String) {
    fn from(e: HomeError) -> Self {
        (e.status(), e.user_message())
    }
}
