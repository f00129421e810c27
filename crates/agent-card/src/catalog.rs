//! Guides and mini-trainings sold from the contact card, plus the resources
//! still locked behind the private access list.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableGuide {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub status: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub cta_label: &'static str,
    pub cta_href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedResource {
    pub id: &'static str,
    pub title: &'static str,
    pub preview: &'static str,
    pub status: &'static str,
    pub button_label: &'static str,
}

/// Shown when a visitor tries to open a locked resource.
pub const LOCKED_MESSAGE: &str = "Ce contenu n'est pas encore disponible. Priorité aux abonnés + -10% au lancement. 👉 Rejoins la liste privée";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideCatalog {
    pub available: Vec<AvailableGuide>,
    pub locked: Vec<LockedResource>,
    pub locked_message: &'static str,
}

impl GuideCatalog {
    pub fn standard() -> Self {
        Self {
            available: vec![
                AvailableGuide {
                    id: "sell-guide",
                    category: "Guide",
                    title: "Vendre sereinement dans le Finistère",
                    status: "Disponible",
                    description: "Préparer, estimer, éviter les erreurs, gérer les visites, sélectionner l'agent ou vendre seul.",
                    price: "19€",
                    cta_label: "Accéder au guide",
                    cta_href: "https://www.alvimmobilier.com/boutique",
                },
                AvailableGuide {
                    id: "perfect-checklist",
                    category: "Checklist",
                    title: "Dossier Vente Parfait",
                    status: "Disponible",
                    description: "Tous les documents, étapes et contrôles avant mise en vente.",
                    price: "15€",
                    cta_label: "Télécharger",
                    cta_href: "https://www.alvimmobilier.com/boutique",
                },
            ],
            locked: vec![
                LockedResource {
                    id: "investor-dossier",
                    title: "Dossier Investisseur Finistère - chiffres & loyers",
                    preview: "Statistiques locales, secteurs, vacance, stratégies.",
                    status: "🔒 Accès bientôt - réservé aux abonnés",
                    button_label: "Accès refusé - bientôt disponible",
                },
                LockedResource {
                    id: "negociation-guide",
                    title: "Guide Négociation Immobilière Locale",
                    preview: "Scripts, objections, psychologie du vendeur.",
                    status: "🔒 Disponible prochainement",
                    button_label: "Accès refusé",
                },
                LockedResource {
                    id: "profitable-training",
                    title: "Formation - Trouver un bien rentable dans le Finistère",
                    preview: "Recherche, analyse, calculs, offres.",
                    status: "🔒 Sortie prévue prochainement",
                    button_label: "Réservé - sortie prochaine",
                },
                LockedResource {
                    id: "tax-pack",
                    title: "Pack Fiscalité Immobilier Débutant",
                    preview: "LMNP / SCI / plus-value / arbitrage simple.",
                    status: "🔒 En cours de création",
                    button_label: "Verrouillé 🔒",
                },
            ],
            locked_message: LOCKED_MESSAGE,
        }
    }

    pub fn locked_resource(&self, id: &str) -> Option<&LockedResource> {
        self.locked.iter().find(|resource| resource.id == id)
    }
}
