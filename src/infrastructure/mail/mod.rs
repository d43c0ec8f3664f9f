//! Outbound email.
//!
//! [`SmtpNotifier`] delivers through an SMTP relay with STARTTLS and retries
//! transient failures. [`LogNotifier`] only logs, and is used when `SMTP_HOST`
//! is not configured.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::ports::{Notifier, NotifyError};

const SEND_ATTEMPTS: usize = 3;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| NotifyError::Delivery(e.to_string()))?
            .port(settings.port);

        if let (Some(user), Some(password)) = (&settings.user, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: settings.from.clone(),
        })
    }
}

/// Assembles an HTML message.
pub fn build_message(
    from: &str,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<Message, NotifyError> {
    let from = from
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;
    let to = recipient
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body.to_string())
        .map_err(|e| NotifyError::Build(e.to_string()))
}

/// Delays between send attempts: 200ms, then 2s.
fn retry_delays() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(10)
        .factor(20)
        .max_delay(MAX_RETRY_DELAY)
        .take(SEND_ATTEMPTS - 1)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_message(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let message = build_message(&self.from, recipient, subject, body)?;

        let strategy = retry_delays().map(jitter);

        let transport = &self.transport;
        let message = &message;

        Retry::start(strategy, || async move {
            transport.send(message.clone()).await.map_err(|e| {
                tracing::warn!(recipient, error = %e, "SMTP send attempt failed");
                e
            })
        })
        .await
        .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        tracing::info!(recipient, subject, "Email sent");
        Ok(())
    }
}

/// Logs messages instead of sending them.
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(
        &self,
        recipient: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(recipient, subject, "SMTP not configured; email not sent");
        Ok(())
    }
}
