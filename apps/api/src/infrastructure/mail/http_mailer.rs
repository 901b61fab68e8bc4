use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::notifications::{EmailMessage, MailError, Mailer};

/// Delivers mail through an HTTP mailer service
///
/// Each message is POSTed as JSON to `<base_url>/send/email`.
pub struct HttpMailer {
    client: reqwest::Client,
    base_url: String,
}

/// Upper bound on one delivery, connect included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpMailer {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MailError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Registration awaits delivery, so a stalled mailer must not hold the request open
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/send/email", self.base_url)
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Sending email");

        let response = self
            .client
            .post(self.endpoint())
            .json(&json!({
                "email": message.to,
                "subject": message.subject,
                "body": message.body,
            }))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Verify your email".to_string(),
            body: "Hi".to_string(),
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mailer = HttpMailer::new("http://mailer:8082/").unwrap();
        assert_eq!(mailer.endpoint(), "http://mailer:8082/send/email");
    }

    #[tokio::test]
    async fn stalled_mailer_times_out() {
        // Accepts connections and never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mailer =
            HttpMailer::with_timeout(format!("http://{addr}"), Duration::from_millis(200)).unwrap();

        let started = Instant::now();
        let result = mailer.send(message()).await;

        assert!(matches!(result, Err(MailError::Transport(_))), "{result:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
