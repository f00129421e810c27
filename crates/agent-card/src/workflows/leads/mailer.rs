use std::sync::{Arc, Mutex};

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use crate::config::{ConfigError, MailConfig, SmtpSettings};

/// Internal notification addressed to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Outbound mail port. Implementations may block.
pub trait Mailer: Send + Sync {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

/// SMTP delivery via lettre. Settings are checked on every send so the
/// service can boot without mail configured.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(settings: &SmtpSettings) -> Result<SmtpTransport, MailError> {
        let builder = if settings.secure {
            SmtpTransport::relay(&settings.host)?
        } else {
            SmtpTransport::starttls_relay(&settings.host)?
        };
        let credentials = Credentials::new(settings.user.clone(), settings.password.clone());
        Ok(builder
            .port(settings.port)
            .credentials(credentials)
            .build())
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let settings = self.config.resolve()?;
        let from: Mailbox = settings.user.parse()?;
        let to: Mailbox = settings.notify_to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;

        debug!(
            host = %settings.host,
            port = settings.port,
            secure = settings.secure,
            "sending notification"
        );
        Self::transport(&settings)?.send(&message)?;
        info!(subject = %email.subject, "notification delivered");
        Ok(())
    }
}

/// Keeps outgoing mail in memory; used by tests and the CLI demo.
#[derive(Debug, Default, Clone)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| MailError::Unavailable("recorder mutex poisoned".to_string()))?;
        guard.push(email);
        Ok(())
    }
}
