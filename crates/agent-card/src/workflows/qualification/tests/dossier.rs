use super::common::*;
use crate::workflows::qualification::answers::{
    DiscoveredVia, FieldKey, FormAnswers, ProjectType, Timeline, YesNo,
};
use crate::workflows::qualification::dossier::{
    build_dossier, display_value, review_sections, PLACEHOLDER,
};
use crate::workflows::qualification::steps::StepId;

#[test]
fn dossier_is_pure_and_deterministic() {
    let answers = complete_answers();
    let first = build_dossier(&answers, OWNER);
    let second = build_dossier(&answers, OWNER);
    assert_eq!(first, second);
}

#[test]
fn dossier_lists_sections_in_order_with_labels() {
    let text = build_dossier(&complete_answers(), OWNER);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Dossier projet immobilier envoyé via la carte de Matthis Foveau")
    );

    let headings: Vec<&str> = text
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.starts_with(' '))
        .skip(1)
        .collect();
    assert_eq!(
        headings,
        vec![
            "Identité & contact",
            "Projet",
            "Timing & situation",
            "Approche marché",
            "Confiance & motivation",
            "Validation",
        ]
    );

    assert!(text.contains("- Calendrier : Immédiat (0-3 mois)"));
    assert!(text.contains("- Préférence de contact : Téléphone"));
    assert!(text.contains("- Expérience immobilière : Oui"));
    assert!(text.contains("- Vente avant achat : Pas concerné"));
    assert!(text.contains("- Niveau de motivation : 7/10"));
    assert!(text.contains("- Engagement sélectif accepté"));
    assert!(text.contains("- Projet déclaré sérieux et dans le Finistère"));
}

#[test]
fn empty_answers_render_placeholders() {
    let text = build_dossier(&FormAnswers::default(), OWNER);
    assert!(text.contains(&format!("- Nom : {PLACEHOLDER}")));
    assert!(text.contains(&format!("- Calendrier : {PLACEHOLDER}")));
    assert!(text.contains("- Souhaite être rappelé : —"));
    assert!(!text.contains("Engagement sélectif accepté"));
}

#[test]
fn agency_detail_line_only_when_agencies_were_contacted() {
    let mut answers = complete_answers();
    answers.contacted_agencies = Some(YesNo::No);
    answers.contacted_agency_details = "Reste d'une saisie précédente".to_string();
    let text = build_dossier(&answers, OWNER);
    assert!(text.contains("- Contact agences : Non"));
    assert!(!text.contains("  > Détails"));
    assert!(!text.contains("Reste d'une saisie précédente"));

    answers.contacted_agencies = Some(YesNo::Yes);
    let text = build_dossier(&answers, OWNER);
    assert!(text.contains("  > Détails : Reste d'une saisie précédente"));
}

#[test]
fn discovery_precision_line_only_for_other_source() {
    let mut answers = complete_answers();
    answers.discovered_via_other = "Salon".to_string();
    assert!(!build_dossier(&answers, OWNER).contains("  > Précision"));

    answers.discovered_via = Some(DiscoveredVia::Other);
    let text = build_dossier(&answers, OWNER);
    assert!(text.contains("- Origine du contact : Autre : Salon"));
    assert!(text.contains("  > Précision : Salon"));
}

#[test]
fn other_choices_show_their_detail() {
    let mut answers = complete_answers();
    answers.project_type = Some(ProjectType::Other);
    assert_eq!(
        display_value(FieldKey::ProjectType, &answers),
        "Autre : à préciser"
    );

    answers.project_type_other = "  Viager occupé ".to_string();
    assert_eq!(
        display_value(FieldKey::ProjectType, &answers),
        "Autre : Viager occupé"
    );
}

#[test]
fn display_value_covers_each_kind() {
    let mut answers = complete_answers();
    answers.timeline = Some(Timeline::Thinking);
    assert_eq!(display_value(FieldKey::Timeline, &answers), "En réflexion");
    assert_eq!(display_value(FieldKey::ValidationAccepted, &answers), "Oui");
    assert_eq!(display_value(FieldKey::MotivationLevel, &answers), "7/10");
    assert_eq!(display_value(FieldKey::Phone, &answers), "06 12 34 56 78");
}

#[test]
fn review_sections_point_back_to_their_steps() {
    let mut answers = complete_answers();
    answers.contacted_agencies = Some(YesNo::Yes);
    let sections = review_sections(&answers);

    let owners: Vec<StepId> = sections.iter().map(|section| section.step).collect();
    assert_eq!(
        owners,
        vec![
            StepId::Profile,
            StepId::Project,
            StepId::Timeline,
            StepId::Market,
            StepId::Engagement,
            StepId::Validation,
        ]
    );

    let market = &sections[3];
    let agencies = market
        .items
        .iter()
        .find(|item| item.label == "Autres agences")
        .expect("agencies item");
    assert_eq!(agencies.value, "Oui — à préciser");

    let engagement = &sections[4];
    assert!(engagement
        .items
        .iter()
        .any(|item| item.label == "Motivation" && item.value == "7 / 10"));
}
