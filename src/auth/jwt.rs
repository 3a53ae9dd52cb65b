use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use super::dto::Session;
use super::provider::{Account, PublicAccount};
use crate::{config::JwtConfig, state::AppState};

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub verify_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: minutes(cfg.ttl_minutes),
            refresh_ttl: minutes(cfg.refresh_ttl_minutes),
            verify_ttl: minutes(cfg.verify_ttl_minutes),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

fn minutes(m: i64) -> Duration {
    Duration::from_secs((m.max(0) as u64).saturating_mul(60))
}

impl JwtKeys {
    fn sign_with_kind(
        &self,
        account_id: Uuid,
        kind: TokenKind,
        email: Option<String>,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
            TokenKind::Verify => self.verify_ttl,
        };
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
            .ok_or_else(|| anyhow::anyhow!("token lifetime out of range: {:?}", kind))?;
        let claims = Claims {
            sub: account_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
            email,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(account_id = %account_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, TokenKind::Access, None)
    }
    pub fn sign_refresh(&self, account_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, TokenKind::Refresh, None)
    }
    pub fn sign_verify(&self, account_id: Uuid, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, TokenKind::Verify, Some(email.to_string()))
    }

    /// Issue an access/refresh pair for the account.
    pub fn session_for(&self, account: &Account) -> anyhow::Result<Session> {
        Ok(Session {
            access_token: self.sign_access(account.id)?,
            refresh_token: self.sign_refresh(account.id)?,
            account: PublicAccount::from(account),
        })
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(account_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    fn verify_kind(&self, token: &str, kind: TokenKind) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            anyhow::bail!("not a {:?} token", kind);
        }
        Ok(claims)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        self.verify_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        self.verify_kind(token, TokenKind::Refresh)
    }

    pub fn verify_email_token(&self, token: &str) -> anyhow::Result<Claims> {
        self.verify_kind(token, TokenKind::Verify)
    }
}
