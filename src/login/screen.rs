use std::sync::Arc;

use axum::extract::FromRef;

use super::service::sign_in;
use crate::auth::{dto::Session, jwt::JwtKeys, IdentityProvider};
use crate::{routes::Route, state::AppState};

/// Login form state: two buffers, the shown error and where we are.
pub struct LoginScreen {
    identity: Arc<dyn IdentityProvider>,
    keys: JwtKeys,
    pub email: String,
    pub password: String,
    error: Option<String>,
    location: Route,
    session: Option<Session>,
}

impl LoginScreen {
    pub fn new(identity: Arc<dyn IdentityProvider>, keys: JwtKeys) -> Self {
        Self {
            identity,
            keys,
            email: String::new(),
            password: String::new(),
            error: None,
            location: Route::Login,
            session: None,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.identity), JwtKeys::from_ref(state))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn location(&self) -> Route {
        self.location
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Submit the form. Navigates home on success, otherwise shows the error.
    pub async fn submit(&mut self) {
        match sign_in(self.identity.as_ref(), &self.keys, &self.email, &self.password).await {
            Ok(session) => {
                self.error = None;
                self.session = Some(session);
                self.location = Route::Home;
            }
            Err(e) => self.error = Some(e.message().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::InMemoryIdentityProvider;
    use crate::config::AppConfig;
    use crate::login::service::{INCORRECT_PASSWORD, USER_NOT_FOUND};

    async fn screen_with_ana() -> LoginScreen {
        let idp = Arc::new(InMemoryIdentityProvider::new());
        idp.create_account("ana@x.com", "abcd1234").await.unwrap();
        LoginScreen::new(idp, JwtKeys::from(&AppConfig::in_memory().jwt))
    }

    #[tokio::test]
    async fn unknown_email_stays_on_login() {
        let mut screen = screen_with_ana().await;
        screen.email = "nobody@x.com".into();
        screen.password = "abcd1234".into();
        screen.submit().await;

        assert_eq!(screen.error(), Some(USER_NOT_FOUND));
        assert_eq!(screen.location(), Route::Login);
        assert!(screen.session().is_none());
    }

    #[tokio::test]
    async fn from_state_signs_in_against_shared_identity() {
        let state = AppState::in_memory();
        state.identity.create_account("ana@x.com", "abcd1234").await.unwrap();

        let mut screen = LoginScreen::from_state(&state);
        screen.email = "ana@x.com".into();
        screen.password = "abcd1234".into();
        screen.submit().await;

        assert_eq!(screen.location(), Route::Home);
        let token = &screen.session().unwrap().access_token;
        assert!(JwtKeys::from_ref(&state).verify_access(token).is_ok());
    }

    #[tokio::test]
    async fn success_clears_error_and_navigates_home() {
        let mut screen = screen_with_ana().await;
        screen.email = "ana@x.com".into();
        screen.password = "wrong-one".into();
        screen.submit().await;
        assert_eq!(screen.error(), Some(INCORRECT_PASSWORD));

        screen.password = "abcd1234".into();
        screen.submit().await;
        assert_eq!(screen.error(), None);
        assert_eq!(screen.location(), Route::Home);
        assert_eq!(screen.session().map(|s| s.account.email.as_str()), Some("ana@x.com"));
    }
}
