use super::common::*;
use crate::workflows::qualification::answers::{
    DiscoveredVia, FieldKey, FormAnswers, MotivationLevel, ProjectType, PropertyType, YesNo,
};
use crate::workflows::qualification::steps::StepId;
use crate::workflows::qualification::validation::{is_step_valid, missing_fields};

fn valid(step: StepId, answers: &FormAnswers) -> bool {
    let catalog = steps();
    let index = catalog.position(step).expect("step exists");
    is_step_valid(catalog.at(index), answers)
}

fn missing(step: StepId, answers: &FormAnswers) -> Vec<FieldKey> {
    let catalog = steps();
    let index = catalog.position(step).expect("step exists");
    missing_fields(catalog.at(index), answers)
}

#[test]
fn empty_answers_fail_every_step() {
    let answers = FormAnswers::default();
    for step in [
        StepId::Profile,
        StepId::Project,
        StepId::Timeline,
        StepId::Market,
        StepId::Engagement,
        StepId::Validation,
    ] {
        assert!(!valid(step, &answers), "{step:?} should not validate");
    }
}

#[test]
fn complete_answers_pass_every_step() {
    let answers = complete_answers();
    for definition in steps().steps() {
        assert!(
            is_step_valid(definition, &answers),
            "{:?} should validate",
            definition.id
        );
    }
}

#[test]
fn whitespace_only_text_counts_as_empty() {
    let mut answers = profile_answers();
    assert!(valid(StepId::Profile, &answers));

    answers.full_name = "   \t ".to_string();
    assert!(!valid(StepId::Profile, &answers));
    assert_eq!(missing(StepId::Profile, &answers), vec![FieldKey::FullName]);
}

#[test]
fn each_profile_field_is_required() {
    let clears: [fn(&mut FormAnswers); 5] = [
        |a| a.full_name.clear(),
        |a| a.email.clear(),
        |a| a.phone.clear(),
        |a| a.contact_preference = None,
        |a| a.has_experience = None,
    ];
    for clear in clears {
        let mut answers = profile_answers();
        clear(&mut answers);
        assert!(!valid(StepId::Profile, &answers));
        assert_eq!(missing(StepId::Profile, &answers).len(), 1);
    }
}

#[test]
fn other_project_type_requires_detail() {
    let mut answers = complete_answers();
    answers.project_type = Some(ProjectType::Other);
    answers.project_type_other = String::new();

    assert!(answers.project_type.is_some());
    assert!(!valid(StepId::Project, &answers));
    assert_eq!(
        missing(StepId::Project, &answers),
        vec![FieldKey::ProjectTypeOther]
    );

    answers.project_type_other = "Viager".to_string();
    assert!(valid(StepId::Project, &answers));
}

#[test]
fn other_property_type_requires_detail() {
    let mut answers = complete_answers();
    answers.property_type = Some(PropertyType::Other);
    answers.property_type_other = "  ".to_string();
    assert!(!valid(StepId::Project, &answers));

    answers.property_type_other = "Longère".to_string();
    assert!(valid(StepId::Project, &answers));
}

#[test]
fn contacted_agencies_yes_requires_details() {
    let mut answers = complete_answers();
    answers.contacted_agencies = Some(YesNo::Yes);
    assert!(!valid(StepId::Market, &answers));
    assert_eq!(
        missing(StepId::Market, &answers),
        vec![FieldKey::ContactedAgencyDetails]
    );

    answers.contacted_agency_details = "Deux agences à Châteaulin".to_string();
    assert!(valid(StepId::Market, &answers));

    answers.contacted_agencies = Some(YesNo::No);
    answers.contacted_agency_details.clear();
    assert!(valid(StepId::Market, &answers));
}

#[test]
fn other_discovery_source_requires_precision() {
    let mut answers = complete_answers();
    answers.discovered_via = Some(DiscoveredVia::Other);
    assert!(!valid(StepId::Engagement, &answers));

    answers.discovered_via_other = "Salon de l'habitat".to_string();
    assert!(valid(StepId::Engagement, &answers));
}

#[test]
fn zero_motivation_level_is_a_valid_answer() {
    let mut answers = complete_answers();
    answers.motivation_level = MotivationLevel::try_from(0).expect("in range");
    assert!(valid(StepId::Engagement, &answers));
}

#[test]
fn validation_step_needs_both_consents() {
    let mut answers = complete_answers();
    answers.validation_accepted = false;
    assert!(!valid(StepId::Validation, &answers));
    assert_eq!(
        missing(StepId::Validation, &answers),
        vec![FieldKey::ValidationAccepted]
    );

    answers.validation_accepted = true;
    answers.commitment_confirmed = false;
    assert!(!valid(StepId::Validation, &answers));

    answers.commitment_confirmed = true;
    answers.callback_preference = None;
    assert!(!valid(StepId::Validation, &answers));
    assert_eq!(
        missing(StepId::Validation, &answers),
        vec![FieldKey::CallbackPreference]
    );
}

#[test]
fn hidden_detail_fields_are_never_reported_missing() {
    let answers = FormAnswers::default();
    let project = missing(StepId::Project, &answers);
    assert!(!project.contains(&FieldKey::ProjectTypeOther));
    assert!(!project.contains(&FieldKey::PropertyTypeOther));
    assert!(!missing(StepId::Market, &answers).contains(&FieldKey::ContactedAgencyDetails));
}
