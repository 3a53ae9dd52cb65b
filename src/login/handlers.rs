use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::dto::{LoginRequest, LoginResponse};
use super::service::sign_in;
use crate::{auth::jwt::JwtKeys, routes::Route, state::AppState};

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let session = sign_in(
        state.identity.as_ref(),
        &keys,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(LoginResponse {
        session,
        navigate: Route::Home.path().to_string(),
    }))
}
