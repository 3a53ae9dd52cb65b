use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of JWT: access, refresh or email verification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
    #[serde(alias = "Verify")]
    Verify,
}

/// JWT payload used for sessions and verification links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // account ID
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
    pub kind: TokenKind, // token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>, // address being verified (verify tokens only)
}
