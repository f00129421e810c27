use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use super::domain::{parse_lead_email, LeadKind, LeadReceipt};
use super::mailer::{MailError, Mailer, OutboundEmail};

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("Email invalide")]
    InvalidEmail,
    #[error("Erreur lors de l'envoi de l'email")]
    Delivery(#[source] MailError),
}

/// Validates sign-ups and notifies the agent through the mail port.
pub struct LeadCaptureService<M> {
    mailer: Arc<M>,
}

impl<M> LeadCaptureService<M>
where
    M: Mailer + 'static,
{
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }

    /// Blocking: delivery happens on the calling thread.
    pub fn capture(&self, kind: LeadKind, payload: &Value) -> Result<LeadReceipt, LeadError> {
        let email = parse_lead_email(payload).ok_or(LeadError::InvalidEmail)?;

        let notification = OutboundEmail {
            subject: kind.subject().to_string(),
            body: kind.notification_body(email),
        };
        if let Err(err) = self.mailer.send(notification) {
            error!(kind = kind.tag(), error = %err, "lead notification failed");
            return Err(LeadError::Delivery(err));
        }

        info!(kind = kind.tag(), "lead captured");
        Ok(LeadReceipt::for_kind(kind))
    }
}
