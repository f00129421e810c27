use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

use super::{Contact, ContactDirectory};

/// Where a served vCard body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VCardSource {
    StaticFile,
    Generated,
}

/// Resolves vCards from `{public_dir}/contacts/{slug}.vcf`, falling back to
/// a card synthesized from the directory record.
#[derive(Debug, Clone)]
pub struct VCardStore {
    public_dir: PathBuf,
    directory: ContactDirectory,
}

impl VCardStore {
    pub fn new(public_dir: impl Into<PathBuf>, directory: ContactDirectory) -> Self {
        Self {
            public_dir: public_dir.into(),
            directory,
        }
    }

    pub fn resolve(&self, slug: &str) -> Option<(String, VCardSource)> {
        if let Some(body) = self.static_card(slug) {
            return Some((body, VCardSource::StaticFile));
        }

        self.directory
            .by_slug(slug)
            .map(|contact| (build_vcard(contact), VCardSource::Generated))
    }

    fn static_card(&self, slug: &str) -> Option<String> {
        if !is_safe_slug(slug) {
            return None;
        }

        let path = self.public_dir.join("contacts").join(format!("{slug}.vcf"));
        match fs::read_to_string(&path) {
            Ok(body) => Some(body),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "static vcard unreadable");
                None
            }
        }
    }
}

/// Slugs used in file paths may only contain ASCII letters, digits, `_` and `-`.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn escape_vcard_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// vCard 3.0 body with CRLF line endings; absent attributes are left out.
pub fn build_vcard(contact: &Contact) -> String {
    let name = escape_vcard_text(contact.name);
    let optional = |prefix: &str, value: Option<&str>| {
        value.map(|value| format!("{prefix}{}", escape_vcard_text(value)))
    };

    let lines = [
        Some("BEGIN:VCARD".to_string()),
        Some("VERSION:3.0".to_string()),
        Some(format!("N:{name};;;;")),
        Some(format!("FN:{name}")),
        optional("ORG:", contact.org),
        optional("TITLE:", contact.title),
        optional("TEL;TYPE=CELL:", contact.phone),
        optional("EMAIL;TYPE=INTERNET:", contact.email),
        optional("URL:", contact.url),
        optional("ADR;TYPE=WORK:;;;;;", contact.address),
        optional("NOTE:", contact.note),
        Some("END:VCARD".to_string()),
    ];

    lines.into_iter().flatten().collect::<Vec<_>>().join("\r\n")
}
