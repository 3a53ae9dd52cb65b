use std::time::Duration;

use axum::extract::FromRef;
use tracing::{debug, error};
use uuid::Uuid;

use super::errors::HomeError;
use super::feedback::{Feedback, FeedbackSlot};
use super::service::{UserService, UserUpdate};
use crate::{state::AppState, users::UserRecord};

/// Input buffers of the home form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserForm {
    fn clear(&mut self) {
        *self = UserForm::default();
    }
}

/// Stateful home screen for one operator: form buffers, edit mode, the
/// fetched list and the feedback banner. Lives as long as the screen is
/// mounted; dropping it cancels any pending banner timer.
pub struct HomeScreen {
    service: UserService,
    pub form: UserForm,
    editing: Option<Uuid>,
    users: Vec<UserRecord>,
    feedback: FeedbackSlot,
}

impl HomeScreen {
    /// Mount the screen and fetch the list once.
    pub async fn mount(service: UserService, feedback_ttl: Duration) -> Self {
        let mut screen = Self {
            service,
            form: UserForm::default(),
            editing: None,
            users: Vec::new(),
            feedback: FeedbackSlot::new(feedback_ttl),
        };
        screen.load_users().await;
        screen
    }

    /// Mount against the shared backends, with the configured banner TTL.
    pub async fn from_state(state: &AppState) -> Self {
        Self::mount(UserService::from_ref(state), state.config.feedback_ttl()).await
    }

    pub fn feedback_ttl(&self) -> Duration {
        self.feedback.ttl()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub async fn feedback(&self) -> Option<Feedback> {
        self.feedback.current().await
    }

    /// Replace the list with the store's contents. On failure the old list stays.
    pub async fn load_users(&mut self) {
        match self.service.load_users().await {
            Ok(users) => self.users = users,
            Err(e) => error!(error = %e, "keeping stale user list"),
        }
    }

    pub async fn create_user(&mut self) {
        let form = self.form.clone();
        match self
            .service
            .create_user(&form.name, &form.email, &form.password)
            .await
        {
            Ok(_) => {
                self.form.clear();
                self.load_users().await;
                self.feedback.show(Feedback::success("user created")).await;
            }
            Err(e) => self.report(e).await,
        }
    }

    /// Load a listed record into the form. Local only.
    pub fn edit_user(&mut self, id: Uuid) {
        let Some(user) = self.users.iter().find(|u| u.id == id) else {
            debug!(%id, "edit requested for a record not in the list");
            return;
        };
        self.form = UserForm {
            name: user.name.clone(),
            email: user.email.clone(),
            password: String::new(),
        };
        self.editing = Some(id);
    }

    /// Save the record being edited.
    pub async fn save(&mut self) {
        let Some(id) = self.editing else {
            return;
        };
        let update = UserUpdate {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            password: Some(self.form.password.clone()),
        };
        match self.service.update_user(id, update).await {
            Ok(outcome) => {
                self.editing = None;
                self.form.clear();
                self.load_users().await;
                let feedback = if outcome.warnings.is_empty() {
                    Feedback::success("user updated")
                } else {
                    Feedback::error(outcome.warnings.join("; "))
                };
                self.feedback.show(feedback).await;
            }
            Err(e) => self.report(e).await,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    pub async fn delete_user(&mut self, id: Uuid) {
        match self.service.delete_user(id).await {
            Ok(outcome) => {
                if self.editing == Some(id) {
                    self.cancel_edit();
                }
                self.load_users().await;
                let feedback = if outcome.warnings.is_empty() {
                    Feedback::deleted("user deleted")
                } else {
                    Feedback::error(outcome.warnings.join("; "))
                };
                self.feedback.show(feedback).await;
            }
            Err(e) => self.report(e).await,
        }
    }

    async fn report(&mut self, e: HomeError) {
        self.feedback.show(Feedback::error(e.user_message())).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{mailer::LogMailer, memory::InMemoryIdentityProvider};
    use crate::config::AppConfig;
    use crate::home::errors::PASSWORD_LENGTH;
    use crate::home::feedback::FeedbackKind;
    use crate::home::service::tests::fixture;
    use crate::users::{memory::InMemoryUserStore, UserStore};

    const TTL: Duration = Duration::from_millis(3000);

    fn fill(screen: &mut HomeScreen, name: &str, email: &str, password: &str) {
        screen.form = UserForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        };
    }

    #[tokio::test]
    async fn mount_fetches_existing_records() {
        let f = fixture();
        f.service.create_user("Ana", "ana@x.com", "abcd1234").await.unwrap();
        let screen = HomeScreen::mount(f.service.clone(), TTL).await;
        assert_eq!(screen.users().len(), 1);
        assert_eq!(screen.users()[0].name, "Ana");
    }

    #[tokio::test]
    async fn create_clears_form_and_refetches() {
        let f = fixture();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;
        fill(&mut screen, "Ana", "ana@x.com", "abcd1234");
        screen.create_user().await;

        assert_eq!(screen.form, UserForm::default());
        assert_eq!(screen.users(), f.users.list_all().await.unwrap().as_slice());
        assert_eq!(screen.feedback().await.map(|f| f.kind), Some(FeedbackKind::Success));
    }

    #[tokio::test]
    async fn rejected_create_keeps_form_and_reports() {
        let f = fixture();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;
        fill(&mut screen, "Ana", "ana@x.com", "short");
        screen.create_user().await;

        assert_eq!(screen.form.email, "ana@x.com");
        assert!(screen.users().is_empty());
        assert_eq!(screen.feedback().await, Some(Feedback::error(PASSWORD_LENGTH)));
    }

    #[tokio::test]
    async fn edit_then_save_updates_the_target() {
        let f = fixture();
        let a = f.service.create_user("Ana", "ana@x.com", "abcd1234").await.unwrap();
        let b = f.service.create_user("Bia", "bia@x.com", "abcd1234").await.unwrap();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;

        screen.edit_user(a.id);
        assert_eq!(screen.editing(), Some(a.id));
        assert_eq!(screen.form.name, "Ana");
        assert_eq!(screen.form.email, "ana@x.com");

        screen.form.name = "Ana Maria".into();
        screen.save().await;

        assert_eq!(screen.editing(), None);
        assert_eq!(screen.form, UserForm::default());
        let stored = f.service.get_user(a.id).await.unwrap();
        assert_eq!(stored.name, "Ana Maria");
        assert_eq!(f.service.get_user(b.id).await.unwrap(), b);
        assert!(screen.users().contains(&stored));
    }

    #[tokio::test]
    async fn edit_unknown_id_is_ignored() {
        let f = fixture();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;
        screen.edit_user(Uuid::new_v4());
        assert_eq!(screen.editing(), None);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_id() {
        let f = fixture();
        let a = f.service.create_user("Ana", "ana@x.com", "abcd1234").await.unwrap();
        let b = f.service.create_user("Bia", "bia@x.com", "abcd1234").await.unwrap();
        let c = f.service.create_user("Cris", "cris@x.com", "abcd1234").await.unwrap();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;

        screen.delete_user(b.id).await;

        let ids: Vec<_> = screen.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert_eq!(screen.feedback().await.map(|f| f.kind), Some(FeedbackKind::Delete));
    }

    #[tokio::test(start_paused = true)]
    async fn from_state_uses_configured_ttl() {
        let mut config = AppConfig::in_memory();
        config.feedback_ttl_ms = 500;
        let state = AppState::from_parts(
            Arc::new(config),
            Arc::new(InMemoryIdentityProvider::new()),
            Arc::new(InMemoryUserStore::new()),
            Arc::new(LogMailer),
        );
        UserService::from_ref(&state)
            .create_user("Ana", "ana@x.com", "abcd1234")
            .await
            .unwrap();

        let mut screen = HomeScreen::from_state(&state).await;
        assert_eq!(screen.feedback_ttl(), Duration::from_millis(500));
        assert_eq!(screen.users().len(), 1);

        screen.delete_user(Uuid::new_v4()).await;
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(screen.feedback().await.is_some());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(screen.feedback().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn feedback_self_clears() {
        let f = fixture();
        let mut screen = HomeScreen::mount(f.service.clone(), TTL).await;
        screen.delete_user(Uuid::new_v4()).await;
        assert_eq!(screen.feedback().await, Some(Feedback::error("user not found")));

        tokio::time::sleep(TTL + Duration::from_millis(1)).await;
        assert_eq!(screen.feedback().await, None);
    }
}
