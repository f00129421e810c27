use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::analytics::RecordingAnalytics;
use crate::contacts::ContactDirectory;
use crate::workflows::qualification::answers::{
    CallbackPreference, ContactPreference, DiscoveredVia, FinancingStatus, FormAnswers,
    PriceEstimationMethod, ProjectType, PropertyCondition, PropertyType, SellBeforeBuy, Timeline,
    YesNo,
};
use crate::workflows::qualification::navigation::{WorkflowState, WorkflowStatus};
use crate::workflows::qualification::router::{qualification_router, QualificationService};
use crate::workflows::qualification::steps::StepCatalog;

pub(super) const OWNER: &str = "Matthis Foveau";

pub(super) fn steps() -> StepCatalog {
    StepCatalog::standard()
}

pub(super) fn profile_answers() -> FormAnswers {
    FormAnswers {
        full_name: "Léa Martin".to_string(),
        email: "lea.martin@example.fr".to_string(),
        phone: "06 12 34 56 78".to_string(),
        contact_preference: Some(ContactPreference::Phone),
        has_experience: Some(YesNo::Yes),
        ..FormAnswers::default()
    }
}

/// Answers satisfying every step, including both consent checkboxes.
pub(super) fn complete_answers() -> FormAnswers {
    FormAnswers {
        project_type: Some(ProjectType::Sell),
        project_location: "Pleyben".to_string(),
        property_type: Some(PropertyType::House),
        property_details: "110 m², 4 chambres, jardin".to_string(),
        property_condition: Some(PropertyCondition::Good),
        motivation: "Mutation professionnelle à Rennes".to_string(),
        timeline: Some(Timeline::Now),
        financing_status: Some(FinancingStatus::Cash),
        sell_before_buy: Some(SellBeforeBuy::NotApplicable),
        price_expectation: "245 000 €".to_string(),
        price_estimation_method: Some(PriceEstimationMethod::Comparison),
        contacted_agencies: Some(YesNo::No),
        discovered_via: Some(DiscoveredVia::Instagram),
        reason_to_work: "Approche locale et sélective".to_string(),
        callback_preference: Some(CallbackPreference::Yes),
        validation_accepted: true,
        commitment_confirmed: true,
        ..profile_answers()
    }
}

pub(super) fn editing_at(step: usize) -> WorkflowState {
    WorkflowState {
        current_step: step,
        status: WorkflowStatus::Editing,
        show_validation: false,
    }
}

pub(super) fn in_status(status: WorkflowStatus) -> WorkflowState {
    WorkflowState {
        current_step: 5,
        status,
        show_validation: false,
    }
}

pub(super) fn build_router() -> (Router, RecordingAnalytics) {
    let analytics = RecordingAnalytics::default();
    let service = QualificationService::new(
        Arc::new(ContactDirectory::standard()),
        Arc::new(steps()),
        Arc::new(analytics.clone()),
    );
    (qualification_router(Arc::new(service)), analytics)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
