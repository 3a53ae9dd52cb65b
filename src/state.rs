use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{
    mailer::{LogMailer, VerificationMailer},
    memory::InMemoryIdentityProvider,
    repo::PgIdentityProvider,
    IdentityProvider,
};
use crate::config::{AppConfig, BackendKind};
use crate::users::{memory::InMemoryUserStore, repo::PgUserStore, UserStore};

/// Backend handles shared by every request. Built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserStore>,
    pub mailer: Arc<dyn VerificationMailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let mailer = Arc::new(LogMailer) as Arc<dyn VerificationMailer>;

        match &config.backend {
            BackendKind::Postgres { database_url } => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                Ok(Self {
                    identity: Arc::new(PgIdentityProvider::new(db.clone())),
                    users: Arc::new(PgUserStore::new(db)),
                    config,
                    mailer,
                })
            }
            BackendKind::Memory => {
                tracing::warn!("using in-memory backend; data is lost on exit");
                Ok(Self::from_parts(
                    config,
                    Arc::new(InMemoryIdentityProvider::new()),
                    Arc::new(InMemoryUserStore::new()),
                    mailer,
                ))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn VerificationMailer>,
    ) -> Self {
        Self {
            config,
            identity,
            users,
            mailer,
        }
    }

    /// Fresh in-memory backends with test settings.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::in_memory()),
            Arc::new(InMemoryIdentityProvider::new()),
            Arc::new(InMemoryUserStore::new()),
            Arc::new(LogMailer),
        )
    }
}
