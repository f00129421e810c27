//! Newsletter and private-access sign-ups, relayed to the agent by e-mail.

pub mod domain;
pub mod mailer;
pub mod router;
pub mod service;

pub use domain::{parse_lead_email, LeadKind, LeadReceipt};
pub use mailer::{MailError, Mailer, OutboundEmail, RecordingMailer, SmtpMailer};
pub use router::lead_router;
pub use service::{LeadCaptureService, LeadError};
