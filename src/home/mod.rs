mod dto;
pub mod errors;
pub mod feedback;
pub mod handlers;
pub mod screen;
pub mod service;

use crate::state::AppState;
use axum::Router;

pub use errors::HomeError;
pub use screen::HomeScreen;
pub use service::UserService;

pub fn router() -> Router<AppState> {
    handlers::home_routes()
}
