use serde::Serialize;
use serde_json::Value;

/// The two sign-up forms of the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    Newsletter,
    PrivateAccess,
}

impl LeadKind {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Newsletter => "lead_newsletter_immobilier",
            Self::PrivateAccess => "lead_guides_prives",
        }
    }

    pub const fn subject(self) -> &'static str {
        match self {
            Self::Newsletter => "[NOUVEL INSCRIT] — Newsletter Immobilier Finistère",
            Self::PrivateAccess => {
                "[NOUVEL ACCÈS PRIVÉ] — Guides & Ressources Immobilier Finistère"
            }
        }
    }

    const fn intro(self) -> &'static str {
        match self {
            Self::Newsletter => "Nouvelle inscription à la newsletter locale.",
            Self::PrivateAccess => "Nouvelle demande d'accès privé aux ressources.",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::Newsletter => "Section \"Analyses du marché immobilier\"",
            Self::PrivateAccess => "Section \"Accès privé – Ressources Finistère\"",
        }
    }

    /// Confirmation shown to the visitor once the agent has been notified.
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Newsletter => {
                "✅ Merci, vous êtes inscrit.\nVous recevrez bientôt les prochaines analyses du marché."
            }
            Self::PrivateAccess => {
                "🔒 Merci, accès prioritaire confirmé.\nVous serez notifié dès qu'une ressource sera disponible."
            }
        }
    }

    /// Plain-text notification body sent to the agent.
    pub fn notification_body(self, email: &str) -> String {
        format!(
            "{}\n\nEmail : {email}\nSource : {}\nTag : {}",
            self.intro(),
            self.source(),
            self.tag()
        )
    }
}

/// Response body of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReceipt {
    pub success: bool,
    pub message: &'static str,
}

impl LeadReceipt {
    pub fn for_kind(kind: LeadKind) -> Self {
        Self {
            success: true,
            message: kind.success_message(),
        }
    }
}

/// Extract the `email` of a sign-up payload.
///
/// Only a string containing `@` is accepted; the value is passed on as sent.
pub fn parse_lead_email(payload: &Value) -> Option<&str> {
    payload
        .get("email")
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty() && email.contains('@'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_only_string_emails_with_at_sign() {
        assert_eq!(
            parse_lead_email(&json!({ "email": "lea@example.fr" })),
            Some("lea@example.fr")
        );
        assert_eq!(parse_lead_email(&json!({ "email": "lea.example.fr" })), None);
        assert_eq!(parse_lead_email(&json!({ "email": "" })), None);
        assert_eq!(parse_lead_email(&json!({ "email": 42 })), None);
        assert_eq!(parse_lead_email(&json!({ "mail": "lea@example.fr" })), None);
        assert_eq!(parse_lead_email(&json!(["lea@example.fr"])), None);
    }

    #[test]
    fn newsletter_notification_lists_email_source_and_tag() {
        let body = LeadKind::Newsletter.notification_body("lea@example.fr");
        assert_eq!(
            body,
            "Nouvelle inscription à la newsletter locale.\n\nEmail : lea@example.fr\nSource : Section \"Analyses du marché immobilier\"\nTag : lead_newsletter_immobilier"
        );
    }

    #[test]
    fn private_access_uses_its_own_subject_and_tag() {
        let kind = LeadKind::PrivateAccess;
        assert!(kind.subject().starts_with("[NOUVEL ACCÈS PRIVÉ]"));
        assert!(kind
            .notification_body("lea@example.fr")
            .ends_with("Tag : lead_guides_prives"));
        assert!(LeadReceipt::for_kind(kind).message.starts_with("🔒"));
    }
}
