use async_trait::async_trait;
use thiserror::Error;

/// A plain-text email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mailer request failed: {0}")]
    Transport(String),

    #[error("mailer rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound email port
///
/// Registration uses it to deliver email verification links.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}
