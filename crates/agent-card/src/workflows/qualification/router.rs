use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::answers::FormAnswers;
use super::dossier::build_dossier;
use super::handoff::dossier_mailto;
use super::navigation::{reduce, TransitionOutcome, WorkflowAction, WorkflowState, WorkflowStatus};
use super::session::{outcome_event, step_view_event};
use super::steps::{StepCatalog, StepSummary};
use super::views::{ProjectionContext, WorkflowView};
use crate::analytics::{dispatch, AnalyticsSink};
use crate::contacts::{Contact, ContactDirectory};

/// Stateless reducer service: every request carries its own state and answers.
pub struct QualificationService<A> {
    directory: Arc<ContactDirectory>,
    steps: Arc<StepCatalog>,
    analytics: Arc<A>,
}

impl<A> QualificationService<A>
where
    A: AnalyticsSink + 'static,
{
    pub fn new(
        directory: Arc<ContactDirectory>,
        steps: Arc<StepCatalog>,
        analytics: Arc<A>,
    ) -> Self {
        Self {
            directory,
            steps,
            analytics,
        }
    }

    fn contact(&self, slug: &str) -> Option<&Contact> {
        self.directory.by_slug(slug)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationStart {
    pub contact: &'static str,
    pub owner_name: &'static str,
    pub state: WorkflowState,
    pub answers: FormAnswers,
    pub steps: Vec<StepSummary>,
    pub view: WorkflowView,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    #[serde(default)]
    pub state: WorkflowState,
    #[serde(default)]
    pub answers: FormAnswers,
    pub action: WorkflowAction,
    #[serde(default)]
    pub copied: bool,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub state: WorkflowState,
    pub answers: FormAnswers,
    pub outcome: TransitionOutcome,
    pub view: WorkflowView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dossier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
}

/// Router builder exposing the qualification wizard over HTTP.
pub fn qualification_router<A>(service: Arc<QualificationService<A>>) -> Router
where
    A: AnalyticsSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/contacts/:slug/qualification",
            get(start_handler::<A>),
        )
        .route(
            "/api/v1/contacts/:slug/qualification/transition",
            post(transition_handler::<A>),
        )
        .with_state(service)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

pub(crate) async fn start_handler<A>(
    State(service): State<Arc<QualificationService<A>>>,
    Path(slug): Path<String>,
) -> Response
where
    A: AnalyticsSink + 'static,
{
    let Some(contact) = service.contact(&slug) else {
        return not_found();
    };

    let state = WorkflowState::initial();
    let answers = FormAnswers::default();
    let ctx = ProjectionContext {
        contact_email: contact.email,
        copied: false,
    };
    dispatch(
        service.analytics.as_ref(),
        step_view_event(&service.steps, &state).with("contact", contact.slug),
    );

    let payload = QualificationStart {
        contact: contact.slug,
        owner_name: contact.name,
        state,
        view: WorkflowView::project(&service.steps, &state, &answers, ctx),
        answers,
        steps: service.steps.summaries(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn transition_handler<A>(
    State(service): State<Arc<QualificationService<A>>>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Response
where
    A: AnalyticsSink + 'static,
{
    let Some(contact) = service.contact(&slug) else {
        return not_found();
    };
    let request: TransitionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            warn!(contact = contact.slug, error = %error, "unreadable transition request");
            let payload = json!({
                "error": format!("invalid transition request: {error}"),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let reduction = match reduce(
        &service.steps,
        &request.state,
        &request.answers,
        &request.action,
    ) {
        Ok(reduction) => reduction,
        Err(error) => {
            warn!(contact = contact.slug, error = %error, "rejected field update");
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    if let Some(event) = outcome_event(
        &service.steps,
        &reduction.state,
        &reduction.answers,
        &reduction.outcome,
    ) {
        dispatch(service.analytics.as_ref(), event.with("contact", contact.slug));
    }
    if reduction.outcome == TransitionOutcome::Submitted {
        info!(contact = contact.slug, "qualification dossier submitted");
    }

    let status = reduction.state.status;
    let dossier = matches!(status, WorkflowStatus::Review | WorkflowStatus::Submitted)
        .then(|| build_dossier(&reduction.answers, contact.name));
    let mailto = match (status, contact.email, dossier.as_deref()) {
        (WorkflowStatus::Submitted, Some(email), Some(text)) => Some(dossier_mailto(email, text)),
        _ => None,
    };
    let ctx = ProjectionContext {
        contact_email: contact.email,
        copied: request.copied,
    };

    let payload = TransitionResponse {
        view: WorkflowView::project(&service.steps, &reduction.state, &reduction.answers, ctx),
        state: reduction.state,
        answers: reduction.answers,
        outcome: reduction.outcome,
        dossier,
        mailto,
    };
    (StatusCode::OK, Json(payload)).into_response()
}
