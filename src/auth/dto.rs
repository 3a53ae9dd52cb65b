use serde::{Deserialize, Serialize};

use super::provider::PublicAccount;

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Verification link query (`?token=...`) or JSON body.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// A signed-in session: token pair plus the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub account: PublicAccount,
}

#[derive(Debug, Serialize)]
pub struct VerifiedResponse {
    pub account_id: uuid::Uuid,
    pub email_verified: bool,
}
