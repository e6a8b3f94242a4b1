//! Email delivery: SMTP transport and the fire-and-forget notifier

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use tokio::{sync::Semaphore, task::JoinHandle};

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Html(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: EmailBody,
}

impl OutgoingEmail {
    /// Confirmation link sent after registration
    pub fn confirmation(to: &str, username: &str, link: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Confirm your Maintrack account".to_string(),
            body: EmailBody::Html(format!(
                r#"<html><body>
<p>Hello {username},</p>
<p>Please confirm your account by clicking the link below:</p>
<p><a href="{link}">Confirm my account</a></p>
<p>This link expires in one hour.</p>
</body></html>"#,
                username = username,
                link = link
            )),
        }
    }

    /// Notice sent to a technician assigned to a maintenance schedule
    pub fn assignment(to: &str, username: &str, description: &str, scheduled: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "New maintenance assignment".to_string(),
            body: EmailBody::Text(format!(
                r#"Hello {username},

You have been assigned a maintenance task.

Description: {description}
Scheduled date: {scheduled}
"#,
                username = username,
                description = description,
                scheduled = scheduled
            )),
        }
    }
}

/// Anything able to deliver one email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &OutgoingEmail) -> AppResult<Message> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Maintrack");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(&email.to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let (content_type, body) = match &email.body {
            EmailBody::Html(html) => (ContentType::TEXT_HTML, html.clone()),
            EmailBody::Text(text) => (ContentType::TEXT_PLAIN, text.clone()),
        };

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(email.subject.as_str())
            .header(content_type)
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> AppResult<SmtpTransport> {
        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        Ok(mailer_builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        let message = self.build_message(&email)?;
        let transport = self.transport()?;

        // SmtpTransport is blocking
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Sends email in detached tasks so callers never wait on SMTP.
///
/// At most `max_in_flight` sends run at once; the rest wait for a permit.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    permits: Arc<Semaphore>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, max_in_flight: usize) -> Self {
        Self {
            mailer,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Queue an email. The outcome is only logged; there is no retry.
    pub fn dispatch(&self, email: OutgoingEmail) -> JoinHandle<()> {
        let mailer = self.mailer.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!(to = %email.to, "Notifier closed, email dropped");
                    return;
                }
            };

            let to = email.to.clone();
            let subject = email.subject.clone();
            match mailer.send(email).await {
                Ok(()) => tracing::info!(to = %to, subject = %subject, "Email sent"),
                Err(e) => tracing::error!(to = %to, subject = %subject, error = %e, "Email delivery failed"),
            }
        })
    }
}
