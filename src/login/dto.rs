use serde::{Deserialize, Serialize};

use crate::auth::dto::Session;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Session plus where the client should go next.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: Session,
    pub navigate: String,
}
