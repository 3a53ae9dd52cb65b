use async_trait::async_trait;
use tracing::info;

/// Delivers verification links. Actual mail transport lives outside this service.
#[async_trait]
pub trait VerificationMailer: Send + Sync + 'static {
    async fn send_verification(&self, email: &str, link: &str) -> anyhow::Result<()>;
}

/// Writes the verification link to the log.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send_verification(&self, email: &str, link: &str) -> anyhow::Result<()> {
        info!(%email, %link, "verification email");
        Ok(())
    }
}
