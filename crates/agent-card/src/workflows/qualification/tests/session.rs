use std::sync::Arc;

use super::common::*;
use crate::analytics::{RecordingAnalytics, UtmParams};
use crate::workflows::qualification::answers::{FieldKey, FieldUpdate, YesNo};
use crate::workflows::qualification::navigation::{
    TransitionOutcome, WorkflowAction, WorkflowStatus,
};
use crate::workflows::qualification::session::QualificationSession;

fn session(analytics: &RecordingAnalytics) -> QualificationSession<RecordingAnalytics> {
    QualificationSession::start(Arc::new(steps()), Arc::new(analytics.clone()), OWNER)
}

fn fill(
    session: &mut QualificationSession<RecordingAnalytics>,
    field: FieldKey,
    value: serde_json::Value,
) {
    session
        .apply(WorkflowAction::UpdateField(FieldUpdate::new(field, value)))
        .expect("valid update");
}

#[test]
fn start_records_first_step_view() {
    let analytics = RecordingAnalytics::default();
    let session = session(&analytics);

    assert_eq!(session.state().current_step, 0);
    assert_eq!(analytics.names(), vec!["qualification_step_view"]);
    assert_eq!(
        analytics.events()[0].properties.get("step").map(String::as_str),
        Some("profile")
    );
}

#[test]
fn blocked_next_is_reported() {
    let analytics = RecordingAnalytics::default();
    let mut session = session(&analytics);

    let outcome = session.apply(WorkflowAction::Next).expect("reduces");
    assert!(matches!(outcome, TransitionOutcome::Blocked { .. }));
    assert!(session.state().show_validation);
    assert_eq!(
        analytics.names(),
        vec!["qualification_step_view", "qualification_validation_blocked"]
    );
}

#[test]
fn scripted_walkthrough_emits_review_and_submission() {
    let analytics = RecordingAnalytics::default();
    let mut session = QualificationSession::start_with_utms(
        Arc::new(steps()),
        Arc::new(analytics.clone()),
        OWNER,
        UtmParams::from_pairs([("utm_source", "instagram")]),
    );

    let answers = serde_json::to_value(complete_answers()).expect("serializes");
    for (key, value) in answers.as_object().expect("object") {
        let field: FieldKey =
            serde_json::from_value(serde_json::Value::String(key.clone())).expect("field key");
        fill(&mut session, field, value.clone());
    }
    assert_eq!(session.answers(), &complete_answers());

    for _ in 0..6 {
        session.apply(WorkflowAction::Next).expect("reduces");
    }
    assert_eq!(session.state().status, WorkflowStatus::Review);

    let outcome = session.apply(WorkflowAction::Submit).expect("reduces");
    assert_eq!(outcome, TransitionOutcome::Submitted);
    assert_eq!(session.state().status, WorkflowStatus::Submitted);

    let names = analytics.names();
    assert_eq!(names.first(), Some(&"qualification_step_view"));
    assert_eq!(
        names.iter().filter(|name| **name == "qualification_step_view").count(),
        6
    );
    assert!(names.contains(&"qualification_review"));
    assert_eq!(names.last(), Some(&"qualification_submitted"));
    assert!(analytics
        .events()
        .iter()
        .all(|event| event.properties.get("utm_source").map(String::as_str) == Some("instagram")));

    let dossier = session.dossier();
    assert!(dossier.contains("- Souhaite être rappelé : Oui"));
}

#[test]
fn rejected_update_leaves_session_untouched() {
    let analytics = RecordingAnalytics::default();
    let mut session = session(&analytics);
    fill(&mut session, FieldKey::HasExperience, serde_json::json!("yes"));

    let error = session
        .apply(WorkflowAction::UpdateField(FieldUpdate::new(
            FieldKey::HasExperience,
            true,
        )))
        .expect_err("wrong type");
    assert!(error.to_string().contains("hasExperience"));
    assert_eq!(session.answers().has_experience, Some(YesNo::Yes));
}
