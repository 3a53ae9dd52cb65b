pub mod app;
pub mod auth;
pub mod config;
pub mod home;
pub mod login;
pub mod routes;
pub mod state;
pub mod users;
