//! Outbound transactional email through an HTTP mail relay.
//!
//! Without relay credentials the mailer runs in degraded mode: messages
//! are logged and dropped, never failed. The two call sites differ in how
//! they treat a real transport failure — the contact-form alert logs and
//! moves on, the subscriber thank-you fails its request.

use reqwest::StatusCode;

use crate::config::MailRelay;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected the message with status {0}")]
    Relay(StatusCode),
}

#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    relay: Option<MailRelay>,
}

impl Mailer {
    pub fn new(http: reqwest::Client, relay: Option<MailRelay>) -> Self {
        Self { http, relay }
    }

    /// Where contact-form alerts go, if mail is configured at all.
    pub fn notify_to(&self) -> Option<&str> {
        self.relay.as_ref().map(|r| r.notify_to.as_str())
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let Some(relay) = &self.relay else {
            tracing::debug!(to, subject, "mail relay not configured, dropping message");
            return Ok(());
        };

        let res = self
            .http
            .post(&relay.url)
            .bearer_auth(&relay.token)
            .json(&serde_json::json!({
                "from": relay.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(MailError::Relay(res.status()));
        }

        tracing::info!(to, subject, "email dispatched");
        Ok(())
    }
}
