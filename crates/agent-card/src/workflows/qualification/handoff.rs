//! Ways a lead takes the dossier away: clipboard copy and mail-client hand-off.

use chrono::{DateTime, Duration, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::warn;

/// Subject line used when the lead sends themselves a copy.
pub const DOSSIER_MAIL_SUBJECT: &str = "Dossier projet immobilier - Sélection";

/// How long the "copied" confirmation stays visible.
pub const COPY_FEEDBACK_MILLIS: i64 = 2200;

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is not available in this environment")]
    Unavailable,
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Write-only clipboard capability.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Transient status of the last copy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CopyFeedback {
    #[default]
    Idle,
    Copied { until: DateTime<Utc> },
    Failed { until: DateTime<Utc> },
}

impl CopyFeedback {
    pub fn is_copied(&self, now: DateTime<Utc>) -> bool {
        matches!(self, Self::Copied { until } if now < *until)
    }

    pub fn is_failed(&self, now: DateTime<Utc>) -> bool {
        matches!(self, Self::Failed { until } if now < *until)
    }

    pub fn button_label(&self, now: DateTime<Utc>) -> &'static str {
        if self.is_copied(now) {
            "Copié ✅"
        } else {
            "Copier le dossier"
        }
    }
}

/// Copy the dossier; failures are logged and only reflected in the feedback.
pub fn copy_dossier<C: Clipboard + ?Sized>(
    clipboard: &C,
    dossier: &str,
    now: DateTime<Utc>,
) -> CopyFeedback {
    let until = now + Duration::milliseconds(COPY_FEEDBACK_MILLIS);
    match clipboard.write_text(dossier) {
        Ok(()) => CopyFeedback::Copied { until },
        Err(ClipboardError::Unavailable) => {
            warn!("clipboard API not available");
            CopyFeedback::Failed { until }
        }
        Err(err) => {
            warn!(error = %err, "clipboard error");
            CopyFeedback::Failed { until }
        }
    }
}

/// Percent-encode like `encodeURIComponent`.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// `mailto:` link pre-filled with the dossier.
///
/// No length limit is applied; some mail clients truncate long bodies.
pub fn mailto_link(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{recipient}?subject={}&body={}",
        encode_uri_component(subject),
        encode_uri_component(body)
    )
}

pub fn dossier_mailto(recipient: &str, dossier: &str) -> String {
    mailto_link(recipient, DOSSIER_MAIL_SUBJECT, dossier)
}
