use serde::Serialize;

use super::answers::{
    Choice, DiscoveredVia, FieldKey, FieldValue, FormAnswers, ProjectType, PropertyType, YesNo,
};
use super::steps::StepId;

/// Rendered for any empty or unanswered value.
pub const PLACEHOLDER: &str = "—";

const TO_BE_SPECIFIED: &str = "à préciser";

/// Display label of a single answer as it appears in the dossier and review.
pub fn display_value(key: FieldKey, answers: &FormAnswers) -> String {
    match key {
        FieldKey::ProjectType if answers.project_type == Some(ProjectType::Other) => {
            other_label(&answers.project_type_other)
        }
        FieldKey::PropertyType if answers.property_type == Some(PropertyType::Other) => {
            other_label(&answers.property_type_other)
        }
        FieldKey::DiscoveredVia if answers.discovered_via == Some(DiscoveredVia::Other) => {
            other_label(&answers.discovered_via_other)
        }
        _ => match answers.value(key) {
            FieldValue::Text(text) => text_or_placeholder(text),
            FieldValue::Choice(Some(choice)) => choice.label.to_string(),
            FieldValue::Choice(None) => PLACEHOLDER.to_string(),
            FieldValue::Flag(flag) => flag_label(flag).to_string(),
            FieldValue::Scale(level) => format!("{level}/10"),
        },
    }
}

fn other_label(detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        format!("Autre : {TO_BE_SPECIFIED}")
    } else {
        format!("Autre : {detail}")
    }
}

fn text_or_placeholder(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}

fn flag_label(flag: bool) -> &'static str {
    if flag {
        YesNo::Yes.label()
    } else {
        YesNo::No.label()
    }
}

/// Plain-text summary of the answers, used for review, clipboard and e-mail.
pub fn build_dossier(answers: &FormAnswers, owner_name: &str) -> String {
    let value = |key: FieldKey| display_value(key, answers);
    let mut lines: Vec<String> = Vec::with_capacity(40);

    lines.push(format!(
        "Dossier projet immobilier envoyé via la carte de {owner_name}"
    ));

    lines.push(String::new());
    lines.push("Identité & contact".to_string());
    lines.push(format!("- Nom : {}", value(FieldKey::FullName)));
    lines.push(format!("- Email : {}", value(FieldKey::Email)));
    lines.push(format!("- Téléphone : {}", value(FieldKey::Phone)));
    lines.push(format!(
        "- Préférence de contact : {}",
        value(FieldKey::ContactPreference)
    ));
    lines.push(format!(
        "- Expérience immobilière : {}",
        value(FieldKey::HasExperience)
    ));

    lines.push(String::new());
    lines.push("Projet".to_string());
    lines.push(format!("- Nature : {}", value(FieldKey::ProjectType)));
    lines.push(format!("- Zone / adresse : {}", value(FieldKey::ProjectLocation)));
    lines.push(format!("- Type de bien : {}", value(FieldKey::PropertyType)));
    lines.push(format!("- Détails : {}", value(FieldKey::PropertyDetails)));
    lines.push(format!("- État : {}", value(FieldKey::PropertyCondition)));
    lines.push(format!("- Motivation : {}", value(FieldKey::Motivation)));

    lines.push(String::new());
    lines.push("Timing & situation".to_string());
    lines.push(format!("- Calendrier : {}", value(FieldKey::Timeline)));
    lines.push(format!("- Financement : {}", value(FieldKey::FinancingStatus)));
    lines.push(format!(
        "- Vente avant achat : {}",
        value(FieldKey::SellBeforeBuy)
    ));

    lines.push(String::new());
    lines.push("Approche marché".to_string());
    lines.push(format!("- Budget / prix : {}", value(FieldKey::PriceExpectation)));
    lines.push(format!(
        "- Méthode d'estimation : {}",
        value(FieldKey::PriceEstimationMethod)
    ));
    lines.push(format!(
        "- Contact agences : {}",
        value(FieldKey::ContactedAgencies)
    ));
    if answers.contacted_agencies == Some(YesNo::Yes) {
        lines.push(format!(
            "  > Détails : {}",
            value(FieldKey::ContactedAgencyDetails)
        ));
    }

    lines.push(String::new());
    lines.push("Confiance & motivation".to_string());
    lines.push(format!(
        "- Origine du contact : {}",
        value(FieldKey::DiscoveredVia)
    ));
    if answers.discovered_via == Some(DiscoveredVia::Other) {
        lines.push(format!(
            "  > Précision : {}",
            value(FieldKey::DiscoveredViaOther)
        ));
    }
    lines.push(format!(
        "- Pourquoi travailler ensemble : {}",
        value(FieldKey::ReasonToWork)
    ));
    lines.push(format!(
        "- Niveau de motivation : {}",
        value(FieldKey::MotivationLevel)
    ));

    lines.push(String::new());
    lines.push("Validation".to_string());
    lines.push(format!(
        "- Souhaite être rappelé : {}",
        value(FieldKey::CallbackPreference)
    ));
    if answers.validation_accepted {
        lines.push("- Engagement sélectif accepté".to_string());
    }
    if answers.commitment_confirmed {
        lines.push("- Projet déclaré sérieux et dans le Finistère".to_string());
    }

    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub label: &'static str,
    pub value: String,
}

/// One block of the review screen, linked back to the step that edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub title: &'static str,
    pub step: StepId,
    pub items: Vec<ReviewItem>,
}

pub fn review_sections(answers: &FormAnswers) -> Vec<ReviewSection> {
    let item = |label: &'static str, key: FieldKey| ReviewItem {
        label,
        value: display_value(key, answers),
    };

    let agencies = if answers.contacted_agencies == Some(YesNo::Yes) {
        let details = answers.contacted_agency_details.trim();
        let details = if details.is_empty() {
            TO_BE_SPECIFIED
        } else {
            details
        };
        format!("Oui — {details}")
    } else {
        display_value(FieldKey::ContactedAgencies, answers)
    };

    vec![
        ReviewSection {
            title: "Profil",
            step: StepId::Profile,
            items: vec![
                item("Nom", FieldKey::FullName),
                item("Email", FieldKey::Email),
                item("Téléphone", FieldKey::Phone),
                item("Préférence de contact", FieldKey::ContactPreference),
                item("Expérience immobilière", FieldKey::HasExperience),
            ],
        },
        ReviewSection {
            title: "Projet",
            step: StepId::Project,
            items: vec![
                item("Projet", FieldKey::ProjectType),
                item("Adresse / zone", FieldKey::ProjectLocation),
                item("Type de bien", FieldKey::PropertyType),
                item("Caractéristiques", FieldKey::PropertyDetails),
                item("État du bien", FieldKey::PropertyCondition),
                item("Motivation", FieldKey::Motivation),
            ],
        },
        ReviewSection {
            title: "Timing & situation",
            step: StepId::Timeline,
            items: vec![
                item("Calendrier idéal", FieldKey::Timeline),
                item("Financement", FieldKey::FinancingStatus),
                item("Vendre avant d'acheter", FieldKey::SellBeforeBuy),
            ],
        },
        ReviewSection {
            title: "Marché",
            step: StepId::Market,
            items: vec![
                item("Prix / budget", FieldKey::PriceExpectation),
                item("Méthode d'estimation", FieldKey::PriceEstimationMethod),
                ReviewItem {
                    label: "Autres agences",
                    value: agencies,
                },
            ],
        },
        ReviewSection {
            title: "Confiance & motivation",
            step: StepId::Engagement,
            items: vec![
                item("Origine du contact", FieldKey::DiscoveredVia),
                item("Pourquoi travailler ensemble", FieldKey::ReasonToWork),
                ReviewItem {
                    label: "Motivation",
                    value: format!("{} / 10", answers.motivation_level.value()),
                },
            ],
        },
        ReviewSection {
            title: "Validation",
            step: StepId::Validation,
            items: vec![
                item("Souhaite être rappelé", FieldKey::CallbackPreference),
                item("Sélectivité acceptée", FieldKey::ValidationAccepted),
                item("Projet sérieux & Finistère", FieldKey::CommitmentConfirmed),
            ],
        },
    ]
}
