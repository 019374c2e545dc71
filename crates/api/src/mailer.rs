//! Email delivery behind the core [`Notifier`] trait.

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use talentgate_core::notify::{Email, Notifier};
use tracing::info;

use crate::config::SmtpConfig;

/// Sends mail through an SMTP relay using STARTTLS.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .wrap_err_with(|| format!("Invalid SMTP relay {}", config.host))?
            .port(config.port)
            .timeout(Some(config.timeout));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .wrap_err("Invalid MAIL_FROM address")?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn message(&self, email: &Email) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML);
        for to in &email.to {
            builder = builder.to(to
                .parse()
                .wrap_err_with(|| format!("Invalid recipient address {to}"))?);
        }

        builder
            .body(email.html.clone())
            .map_err(|e| eyre!("Failed to build email: {e}"))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: Email) -> Result<()> {
        if email.to.is_empty() {
            return Err(eyre!("Email has no recipients"));
        }

        let message = self.message(&email)?;
        self.transport
            .send(message)
            .await
            .wrap_err("Failed to send email")?;

        info!(recipients = email.to.len(), subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured: records what would have been sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: Email) -> Result<()> {
        info!(to = ?email.to, subject = %email.subject, "SMTP not configured, email not delivered");
        Ok(())
    }
}
