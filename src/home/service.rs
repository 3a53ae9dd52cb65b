use std::sync::Arc;

use axum::extract::FromRef;
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::errors::{identity_message, HomeError, EMPTY_CREDENTIALS, EMPTY_EMAIL, PASSWORD_LENGTH};
use crate::auth::{
    password::meets_policy, provider::normalize_email, verification::Verifier, IdentityError,
    IdentityProvider,
};
use crate::state::AppState;
use crate::users::{NewUserRecord, UserChanges, UserRecord, UserStore};

/// Edit form as submitted. An empty or missing password leaves the credential alone.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
}

/// Result of an update: the stored record plus any account steps that failed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub user: UserRecord,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub deleted: Uuid,
    pub warnings: Vec<String>,
}

/// Home screen operations over the identity provider and the user store.
///
/// Every account-mutating step resolves the account from the record's
/// `user_id`, never from whoever is signed in.
#[derive(Clone)]
pub struct UserService {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
    verifier: Verifier,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        UserService::new(
            Arc::clone(&state.identity),
            Arc::clone(&state.users),
            Verifier::from_ref(state),
        )
    }
}

impl UserService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        verifier: Verifier,
    ) -> Self {
        Self {
            identity,
            users,
            verifier,
        }
    }

    #[instrument(skip(self))]
    pub async fn load_users(&self) -> Result<Vec<UserRecord>, HomeError> {
        let users = self.users.list_all().await.map_err(|e| {
            error!(error = %e, "list users failed");
            HomeError::from(e)
        })?;
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> Result<UserRecord, HomeError> {
        self.users.get(id).await?.ok_or(HomeError::NotFound(id))
    }

    /// Create the identity account first, then the record linked to it.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, HomeError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(HomeError::Validation(EMPTY_CREDENTIALS));
        }
        if !meets_policy(password) {
            return Err(HomeError::Validation(PASSWORD_LENGTH));
        }

        let account = self.identity.create_account(email, password).await.map_err(|e| {
            warn!(error = %e, code = e.code(), "create account rejected");
            HomeError::from(e)
        })?;

        let new_record = NewUserRecord {
            name: name.trim().to_string(),
            email: account.email.clone(),
            user_id: account.id,
        };
        let record = match self.users.create(new_record).await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, account_id = %account.id, "record write failed; removing account");
                if let Err(ce) = self.identity.delete_account(account.id).await {
                    error!(error = %ce, account_id = %account.id, "compensation failed; account orphaned");
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self.verifier.send_verification_email(&account).await {
            warn!(error = %e, account_id = %account.id, "verification email not sent");
        }

        info!(id = %record.id, user_id = %record.user_id, "user created");
        Ok(record)
    }

    /// Write name/email to the record, then carry password and email over to
    /// the linked account. Account steps fail independently and come back as
    /// warnings; a rejected email change is rolled back on the record.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<UpdateOutcome, HomeError> {
        let password = update.password.filter(|p| !p.is_empty());
        if let Some(p) = &password {
            if !meets_policy(p) {
                return Err(HomeError::Validation(PASSWORD_LENGTH));
            }
        }
        let email = normalize_email(&update.email);
        if email.is_empty() {
            return Err(HomeError::Validation(EMPTY_EMAIL));
        }

        let current = self.get_user(id).await?;
        let email_changed = email != current.email;

        let mut record = self
            .users
            .update(
                id,
                UserChanges {
                    name: update.name.trim().to_string(),
                    email: email.clone(),
                },
            )
            .await?;
        let mut warnings = Vec::new();

        if let Some(p) = password {
            if let Err(e) = self.identity.update_password(current.user_id, &p).await {
                warn!(error = %e, user_id = %current.user_id, "password update failed");
                warnings.push(format!("password not updated: {}", identity_message(&e)));
            }
        }

        if email_changed {
            match self.identity.update_email(current.user_id, &email).await {
                Ok(account) => {
                    if let Err(e) = self.verifier.send_verification_email(&account).await {
                        warn!(error = %e, account_id = %account.id, "verification email not sent");
                    }
                }
                Err(e) => {
                    warn!(error = %e, user_id = %current.user_id, "email update failed; reverting record");
                    warnings.push(format!("email not updated: {}", identity_message(&e)));
                    let revert = UserChanges {
                        name: record.name.clone(),
                        email: current.email.clone(),
                    };
                    match self.users.update(id, revert).await {
                        Ok(r) => record = r,
                        Err(re) => error!(error = %re, "record email revert failed"),
                    }
                }
            }
        }

        info!(warnings = warnings.len(), "user updated");
        Ok(UpdateOutcome {
            user: record,
            warnings,
        })
    }

    /// Delete the record, then its linked account.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> Result<DeleteOutcome, HomeError> {
        let record = self.get_user(id).await?;
        self.users.delete(id).await?;

        let mut warnings = Vec::new();
        match self.identity.delete_account(record.user_id).await {
            Ok(()) => {}
            Err(IdentityError::AccountNotFound) => {
                warn!(user_id = %record.user_id, "linked account already gone");
            }
            Err(e) => {
                error!(error = %e, user_id = %record.user_id, "account delete failed after record delete");
                warnings.push(format!("account not deleted: {}", identity_message(&e)));
            }
        }

        info!(user_id = %record.user_id, "user deleted");
        Ok(DeleteOutcome {
            deleted: id,
            warnings,
        })
    }
}
