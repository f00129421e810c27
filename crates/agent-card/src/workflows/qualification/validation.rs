use super::answers::{FieldKey, FormAnswers};
use super::steps::{is_field_visible, StepDefinition, StepId};

/// Required fields present and the step's cross-field rule satisfied.
pub fn is_step_valid(step: &StepDefinition, answers: &FormAnswers) -> bool {
    let required_present = step
        .required
        .iter()
        .all(|key| answers.value(*key).is_present());

    required_present && step.rule.map_or(true, |rule| rule(answers))
}

/// Fields to highlight when the step does not validate, in display order.
///
/// Covers required fields plus the visible paired inputs a rule depends on
/// (the "other" free-text inputs, agency details, consent checkboxes).
pub fn missing_fields(step: &StepDefinition, answers: &FormAnswers) -> Vec<FieldKey> {
    step.fields
        .iter()
        .copied()
        .filter(|key| is_field_visible(*key, answers))
        .filter(|key| is_required_here(step, *key) && !answers.value(*key).is_present())
        .collect()
}

fn is_required_here(step: &StepDefinition, key: FieldKey) -> bool {
    if step.required.contains(&key) {
        return true;
    }
    // Inputs only a rule requires, once visible.
    matches!(
        (step.id, key),
        (StepId::Project, FieldKey::ProjectTypeOther)
            | (StepId::Project, FieldKey::PropertyTypeOther)
            | (StepId::Market, FieldKey::ContactedAgencyDetails)
            | (StepId::Engagement, FieldKey::DiscoveredViaOther)
            | (StepId::Validation, FieldKey::ValidationAccepted)
            | (StepId::Validation, FieldKey::CommitmentConfirmed)
    )
}
