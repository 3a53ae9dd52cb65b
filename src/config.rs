use serde::Deserialize;

/// Upper bound for any token lifetime: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    pub verify_ttl_minutes: i64,
}

/// Which implementation backs the identity provider and the user store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub jwt: JwtConfig,
    pub feedback_ttl_ms: u64,
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = match std::env::var("BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .to_lowercase()
            .as_str()
        {
            "postgres" => BackendKind::Postgres {
                database_url: std::env::var("DATABASE_URL")?,
            },
            "memory" => BackendKind::Memory,
            other => anyhow::bail!("unknown BACKEND: {}", other),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bombinha".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bombinha-operators".into()),
            ttl_minutes: env_ttl_minutes("JWT_TTL_MINUTES", 60)?,
            refresh_ttl_minutes: env_ttl_minutes("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
            verify_ttl_minutes: env_ttl_minutes("JWT_VERIFY_TTL_MINUTES", 60 * 24)?,
        };
        Ok(Self {
            backend,
            jwt,
            feedback_ttl_ms: env_number("FEEDBACK_TTL_MS", 3000),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
        })
    }

    /// Settings for tests and local runs without a database.
    pub fn in_memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
                verify_ttl_minutes: 60,
            },
            feedback_ttl_ms: 3000,
            public_url: "http://localhost:8080".into(),
        }
    }

    pub fn feedback_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.feedback_ttl_ms)
    }
}

fn env_ttl_minutes(key: &str, default: i64) -> anyhow::Result<i64> {
    check_ttl_minutes(key, env_number(key, default))
}

fn check_ttl_minutes(key: &str, minutes: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("{} must be between 1 and {} minutes, got {}", key, MAX_TTL_MINUTES, minutes);
    }
    Ok(minutes)
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
