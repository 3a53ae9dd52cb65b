use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod mailer;
pub mod memory;
pub mod password;
pub mod provider;
pub mod repo;
pub mod verification;

pub use provider::{Account, IdentityError, IdentityProvider, PublicAccount};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
