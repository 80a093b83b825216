use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::info;

use crate::domain::{repositories::mailer::MailSender, value_objects::mail::OutgoingMail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// TLS from the first byte, usually port 465.
    Implicit,
    /// Plain connection upgraded with STARTTLS, usually port 587.
    StartTls,
    /// Local relays and mail catchers only.
    None,
}

impl SmtpTls {
    pub fn for_port(port: u16) -> Self {
        match port {
            465 => Self::Implicit,
            25 | 1025 => Self::None,
            _ => Self::StartTls,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `Name <address>` or a bare address.
    pub from: String,
    pub tls: SmtpTls,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid sender address: {}", config.from))?;

        let builder = match config.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .context("failed to configure smtp relay")?,
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .context("failed to configure smtp starttls relay")?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let builder = builder.port(config.port);
        let builder = match (config.username, config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username, password))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

pub fn build_message(from: &Mailbox, mail: &OutgoingMail) -> Result<Message> {
    let address = mail
        .to_email
        .parse::<Address>()
        .with_context(|| format!("invalid recipient address: {}", mail.to_email))?;
    let to = Mailbox::new(mail.to_name.clone(), address);

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .context("failed to build mail message")
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let message = build_message(&self.from, &mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .context("smtp send failed")?;

        info!(
            to = %mail.to_email,
            subject = %mail.subject,
            code = %response.code(),
            "mail: delivered to relay"
        );
        Ok(())
    }
}
