use async_trait::async_trait;

use crate::domain::notifications::{EmailMessage, MailError, Mailer};

/// Writes outgoing mail to the log instead of delivering it
///
/// Used when no mailer service is configured (local development).
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "MAILER_URL not set; email not delivered"
        );
        Ok(())
    }
}
