use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use super::jwt::JwtKeys;
use super::mailer::VerificationMailer;
use super::provider::{Account, IdentityError, IdentityProvider};
use crate::state::AppState;

/// Issues and redeems email verification links.
#[derive(Clone)]
pub struct Verifier {
    keys: JwtKeys,
    mailer: Arc<dyn VerificationMailer>,
    public_url: String,
}

impl FromRef<AppState> for Verifier {
    fn from_ref(state: &AppState) -> Self {
        Verifier::new(
            JwtKeys::from_ref(state),
            Arc::clone(&state.mailer),
            state.config.public_url.clone(),
        )
    }
}

impl Verifier {
    pub fn new(keys: JwtKeys, mailer: Arc<dyn VerificationMailer>, public_url: String) -> Self {
        Self {
            keys,
            mailer,
            public_url,
        }
    }

    pub fn link_for(&self, token: &str) -> String {
        format!(
            "{}/api/v1/auth/verify?token={}",
            self.public_url.trim_end_matches('/'),
            token
        )
    }

    /// Sign a verification token for the account's current email and mail the link.
    pub async fn send_verification_email(&self, account: &Account) -> Result<(), IdentityError> {
        let token = self.keys.sign_verify(account.id, &account.email)?;
        self.mailer
            .send_verification(&account.email, &self.link_for(&token))
            .await?;
        info!(account_id = %account.id, "verification email sent");
        Ok(())
    }

    /// Redeem a token. Tokens minted for an older email are rejected.
    pub async fn confirm(
        &self,
        identity: &dyn IdentityProvider,
        token: &str,
    ) -> Result<Uuid, IdentityError> {
        let claims = self
            .keys
            .verify_email_token(token)
            .map_err(|_| IdentityError::InvalidToken)?;
        let account = identity
            .account(claims.sub)
            .await?
            .ok_or(IdentityError::AccountNotFound)?;
        if claims.email.as_deref() != Some(account.email.as_str()) {
            warn!(account_id = %account.id, "verification token for a stale email");
            return Err(IdentityError::InvalidToken);
        }
        identity.mark_verified(account.id).await?;
        info!(account_id = %account.id, "email verified");
        Ok(account.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::mailer::testing::RecordingMailer;
    use crate::auth::memory::InMemoryIdentityProvider;
    use crate::config::AppConfig;

    fn token_from(link: &str) -> &str {
        link.split("token=").nth(1).expect("link has a token")
    }

    fn verifier(mailer: Arc<RecordingMailer>) -> Verifier {
        Verifier::new(
            JwtKeys::from(&AppConfig::in_memory().jwt),
            mailer,
            "http://example.test/".into(),
        )
    }

    #[tokio::test]
    async fn send_then_confirm_marks_verified() {
        let idp = InMemoryIdentityProvider::new();
        let mailer = Arc::new(RecordingMailer::default());
        let v = verifier(mailer.clone());

        let account = idp.create_account("ana@x.com", "abcd1234").await.unwrap();
        v.send_verification_email(&account).await.unwrap();

        let sent = mailer.sent.lock().await.clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "ana@x.com");
        assert!(sent[0].1.starts_with("http://example.test/api/v1/auth/verify?token="));

        let id = v.confirm(&idp, token_from(&sent[0].1)).await.unwrap();
        assert_eq!(id, account.id);
        assert!(idp.account(id).await.unwrap().unwrap().email_verified);
    }

    #[tokio::test]
    async fn token_for_old_email_is_rejected() {
        let idp = InMemoryIdentityProvider::new();
        let mailer = Arc::new(RecordingMailer::default());
        let v = verifier(mailer.clone());

        let account = idp.create_account("ana@x.com", "abcd1234").await.unwrap();
        v.send_verification_email(&account).await.unwrap();
        idp.update_email(account.id, "ana2@x.com").await.unwrap();

        let link = mailer.sent.lock().await[0].1.clone();
        let err = v.confirm(&idp, token_from(&link)).await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let idp = InMemoryIdentityProvider::new();
        let v = verifier(Arc::new(RecordingMailer::default()));
        assert!(matches!(
            v.confirm(&idp, "garbage").await,
            Err(IdentityError::InvalidToken)
        ));
    }
}
