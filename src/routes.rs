//! Client routes: `/` is the login screen, `/home` the user list. No guards.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{home::UserService, state::AppState, users::UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Login),
            "/home" => Some(Route::Home),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Home => "/home",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScreenView {
    pub screen: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserRecord>>,
    /// How long the client keeps a feedback banner up.
    #[serde(rename = "feedbackTtlMs", skip_serializing_if = "Option::is_none")]
    pub feedback_ttl_ms: Option<u64>,
}

pub fn screen_routes() -> Router<AppState> {
    Router::new()
        .route(Route::Login.path(), get(login_screen))
        .route(Route::Home.path(), get(home_screen))
}

pub async fn login_screen() -> Json<ScreenView> {
    Json(ScreenView {
        screen: Route::Login,
        users: None,
        feedback_ttl_ms: None,
    })
}

/// Mounting the home screen fetches the whole list.
pub async fn home_screen(
    State(state): State<AppState>,
) -> Result<Json<ScreenView>, (StatusCode, String)> {
    let users = UserService::from_ref(&state).load_users().await?;
    Ok(Json(ScreenView {
        screen: Route::Home,
        users: Some(users),
        feedback_ttl_ms: Some(state.config.feedback_ttl_ms),
    }))
}
