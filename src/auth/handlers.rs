use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{RefreshRequest, Session, VerifiedResponse, VerifyRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        provider::{IdentityError, IdentityProvider, PublicAccount},
        verification::Verifier,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(refresh))
        .route("/auth/verify", get(verify_link).post(verify))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Session>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let account = match state.identity.account(claims.sub).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(account_id = %claims.sub, "refresh for deleted account");
            return Err((StatusCode::UNAUTHORIZED, "User not found".into()));
        }
        Err(e) => {
            error!(error = %e, "account lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let session = keys
        .session_for(&account)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(session))
}

/// GET form, so the mailed link can be opened directly.
pub async fn verify_link(
    state: State<AppState>,
    Query(q): Query<VerifyRequest>,
) -> Result<Json<VerifiedResponse>, (StatusCode, String)> {
    verify(state, Json(q)).await
}

#[instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<VerifiedResponse>, (StatusCode, String)> {
    let verifier = Verifier::from_ref(&state);
    match verifier.confirm(state.identity.as_ref(), &payload.token).await {
        Ok(account_id) => {
            info!(%account_id, "account verified via link");
            Ok(Json(VerifiedResponse {
                account_id,
                email_verified: true,
            }))
        }
        Err(IdentityError::InvalidToken) | Err(IdentityError::AccountNotFound) => Err((
            StatusCode::BAD_REQUEST,
            "Invalid or expired verification link".into(),
        )),
        Err(e) => {
            error!(error = %e, "verification failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<PublicAccount>, (StatusCode, String)> {
    let account = state
        .identity
        .account(account_id)
        .await
        .map_err(|e| {
            error!(error = %e, %account_id, "account lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(PublicAccount::from(&account)))
}
