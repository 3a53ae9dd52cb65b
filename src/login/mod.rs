mod dto;
pub mod handlers;
pub mod screen;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub use screen::LoginScreen;
pub use service::{sign_in, LoginError};

pub fn router() -> Router<AppState> {
    handlers::login_routes()
}
