use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::auth::{dto::Session, jwt::JwtKeys, IdentityError, IdentityProvider};

pub const INCORRECT_EMAIL: &str = "incorrect email";
pub const USER_NOT_FOUND: &str = "user not found";
pub const INCORRECT_PASSWORD: &str = "incorrect password";
pub const GENERIC_FAILURE: &str = "email and/or password incorrect";

#[derive(Debug, Error)]
#[error(transparent)]
pub struct LoginError(#[from] pub IdentityError);

impl LoginError {
    /// Message shown on the login form.
    pub fn message(&self) -> &'static str {
        match self.0 {
            IdentityError::InvalidEmail => INCORRECT_EMAIL,
            IdentityError::AccountNotFound => USER_NOT_FOUND,
            IdentityError::WrongPassword => INCORRECT_PASSWORD,
            _ => GENERIC_FAILURE,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            IdentityError::InvalidEmail => StatusCode::BAD_REQUEST,
            IdentityError::AccountNotFound | IdentityError::WrongPassword => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<LoginError> for (StatusCode, String) {
    fn from(e: LoginError) -> Self {
        (e.status(), e.message().to_string())
    }
}

/// Check credentials with the identity provider and open a session.
#[instrument(skip(identity, keys, password))]
pub async fn sign_in(
    identity: &dyn IdentityProvider,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<Session, LoginError> {
    let account = identity.sign_in(email, password).await.map_err(|e| {
        match &e {
            IdentityError::Backend(_) => error!(error = %e, "sign in failed"),
            _ => warn!(code = e.code(), "sign in rejected"),
        }
        LoginError(e)
    })?;

    let session = keys
        .session_for(&account)
        .map_err(|e| LoginError(IdentityError::Backend(e)))?;
    info!(account_id = %account.id, "signed in");
    Ok(session)
}
