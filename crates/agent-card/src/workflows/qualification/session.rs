use std::sync::Arc;

use tracing::debug;

use super::answers::{Choice, FieldError, FormAnswers};
use super::dossier::build_dossier;
use super::navigation::{reduce, TransitionOutcome, WorkflowAction, WorkflowState};
use super::steps::StepCatalog;
use super::views::{ProjectionContext, WorkflowView};
use crate::analytics::{dispatch, AnalyticsEvent, AnalyticsSink, UtmParams};

/// In-process driver of one wizard run: owns answers and state and reports
/// progress to the analytics sink.
pub struct QualificationSession<A> {
    steps: Arc<StepCatalog>,
    analytics: Arc<A>,
    owner_name: String,
    utms: UtmParams,
    state: WorkflowState,
    answers: FormAnswers,
}

impl<A> QualificationSession<A>
where
    A: AnalyticsSink + 'static,
{
    /// Opens a session on the first step and records the initial step view.
    pub fn start(
        steps: Arc<StepCatalog>,
        analytics: Arc<A>,
        owner_name: impl Into<String>,
    ) -> Self {
        Self::start_with_utms(steps, analytics, owner_name, UtmParams::default())
    }

    pub fn start_with_utms(
        steps: Arc<StepCatalog>,
        analytics: Arc<A>,
        owner_name: impl Into<String>,
        utms: UtmParams,
    ) -> Self {
        let session = Self {
            steps,
            analytics,
            owner_name: owner_name.into(),
            utms,
            state: WorkflowState::initial(),
            answers: FormAnswers::default(),
        };
        session.emit_step_view();
        session
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.answers
    }

    pub fn dossier(&self) -> String {
        build_dossier(&self.answers, &self.owner_name)
    }

    pub fn view(&self, ctx: ProjectionContext<'_>) -> WorkflowView {
        WorkflowView::project(&self.steps, &self.state, &self.answers, ctx)
    }

    /// Feeds one action through the reducer. A rejected field update leaves
    /// the session untouched.
    pub fn apply(&mut self, action: WorkflowAction) -> Result<TransitionOutcome, FieldError> {
        let reduction = reduce(&self.steps, &self.state, &self.answers, &action)?;
        debug!(
            action = action.name(),
            step = reduction.state.current_step,
            status = reduction.state.status.label(),
            "qualification action applied"
        );

        self.state = reduction.state;
        self.answers = reduction.answers;
        self.report(&reduction.outcome);
        Ok(reduction.outcome)
    }

    fn report(&self, outcome: &TransitionOutcome) {
        if let Some(event) = outcome_event(&self.steps, &self.state, &self.answers, outcome) {
            self.emit(event);
        }
    }

    fn emit_step_view(&self) {
        self.emit(step_view_event(&self.steps, &self.state));
    }

    fn emit(&self, event: AnalyticsEvent) {
        dispatch(self.analytics.as_ref(), event.with_utms(&self.utms));
    }
}

pub(crate) fn step_view_event(steps: &StepCatalog, state: &WorkflowState) -> AnalyticsEvent {
    let step = steps.at(state.current_step);
    AnalyticsEvent::new("qualification_step_view")
        .with("step", step.id.code())
        .with("index", state.current_step.to_string())
}

/// Analytics event for a transition, if it is one worth reporting.
///
/// `state` and `answers` are the values after the transition.
pub(crate) fn outcome_event(
    steps: &StepCatalog,
    state: &WorkflowState,
    answers: &FormAnswers,
    outcome: &TransitionOutcome,
) -> Option<AnalyticsEvent> {
    match outcome {
        TransitionOutcome::Advanced { .. }
        | TransitionOutcome::Retreated { .. }
        | TransitionOutcome::ReturnedToEditing { .. }
        | TransitionOutcome::Jumped { .. } => Some(step_view_event(steps, state)),
        TransitionOutcome::Blocked { step, missing } => Some(
            AnalyticsEvent::new("qualification_validation_blocked")
                .with("step", step.code())
                .with("missing", missing.len().to_string()),
        ),
        TransitionOutcome::EnteredReview => Some(AnalyticsEvent::new("qualification_review")),
        TransitionOutcome::Submitted => Some(
            AnalyticsEvent::new("qualification_submitted").with(
                "project_type",
                answers.project_type.map(Choice::code).unwrap_or(""),
            ),
        ),
        TransitionOutcome::Updated { .. } | TransitionOutcome::Rejected { .. } => None,
    }
}
