//! Static contact records behind the public card pages.

mod vcard;

pub use vcard::{build_vcard, escape_vcard_text, is_safe_slug, VCardSource, VCardStore};

use serde::Serialize;

/// Profile shown on the contact card and reused by the vCard and workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub slug: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mini_avatar_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Read-only lookup over the hard-coded contact records.
#[derive(Debug, Clone)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
}

impl ContactDirectory {
    pub fn standard() -> Self {
        Self {
            contacts: standard_contacts(),
        }
    }

    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.slug == slug)
    }

    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }
}

impl Default for ContactDirectory {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_contacts() -> Vec<Contact> {
    vec![Contact {
        slug: "matthis",
        name: "Matthis Foveau",
        title: Some("Conseiller immobilier & investisseur local"),
        handle: Some("matthis_immobilier"),
        status: Some("Accompagnement personnalisé et rigoureux"),
        avatar_url: Some("/images/avatars/matthis-pro.jpg"),
        mini_avatar_url: Some("/images/avatars/profile-solid.png"),
        phone: Some("+33748944694"),
        email: Some("contact@alvimmobilier.bzh"),
        org: Some("ALV Immobilier"),
        url: Some("https://www.alvimmobilier.com"),
        address: Some("19 Pl. Charles de Gaulle, 29190 Pleyben, France"),
        note: Some("Réponse uniquement pour les projets sérieux dans le Finistère."),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_directory_resolves_agent() {
        let directory = ContactDirectory::standard();
        let contact = directory.by_slug("matthis").expect("agent present");
        assert_eq!(contact.name, "Matthis Foveau");
        assert_eq!(contact.email, Some("contact@alvimmobilier.bzh"));
        assert_eq!(directory.all().len(), 1);
    }

    #[test]
    fn unknown_slug_is_absent() {
        let directory = ContactDirectory::standard();
        assert!(directory.by_slug("nobody").is_none());
        assert!(directory.by_slug("Matthis").is_none());
    }

    #[test]
    fn serializes_with_camel_case_and_skips_missing() {
        let contact = Contact {
            slug: "bare",
            name: "Bare Contact",
            title: None,
            handle: None,
            status: None,
            avatar_url: Some("/a.jpg"),
            mini_avatar_url: None,
            phone: None,
            email: None,
            org: None,
            url: None,
            address: None,
            note: None,
        };
        let json = serde_json::to_value(&contact).expect("serializes");
        assert_eq!(json["avatarUrl"], "/a.jpg");
        assert!(json.get("email").is_none());
    }
}
