//! Pure transitions of the qualification wizard.
//!
//! Every operation takes the current [`WorkflowState`] by reference and
//! returns a new one together with a [`TransitionOutcome`]. Operations that
//! are not allowed from the current state return the state unchanged with a
//! `Rejected` outcome instead of failing.

use serde::{Deserialize, Serialize};

use super::answers::{FieldError, FieldKey, FieldUpdate, FormAnswers};
use super::steps::{StepCatalog, StepId};
use super::validation::{is_step_valid, missing_fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Editing,
    Review,
    Submitted,
}

impl WorkflowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Review => "review",
            Self::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowState {
    pub current_step: usize,
    pub status: WorkflowStatus,
    pub show_validation: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// `go_to` past the current step.
    ForwardJump,
    /// `submit` outside the review screen.
    NotInReview,
    /// Field edits are only accepted while a step is being edited.
    NotEditing,
    /// The dossier was already submitted.
    Finished,
}

impl RejectionReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::ForwardJump => "cannot skip ahead of the current step",
            Self::NotInReview => "submit is only available from the review screen",
            Self::NotEditing => "answers can only change while editing a step",
            Self::Finished => "the dossier has already been submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Updated { field: FieldKey },
    Advanced { from: usize, to: usize },
    Blocked { step: StepId, missing: Vec<FieldKey> },
    EnteredReview,
    Retreated { to: usize },
    ReturnedToEditing { step: usize },
    Jumped { to: usize },
    Submitted,
    Rejected { reason: RejectionReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WorkflowState,
    pub outcome: TransitionOutcome,
}

impl WorkflowState {
    pub const fn initial() -> Self {
        Self {
            current_step: 0,
            status: WorkflowStatus::Editing,
            show_validation: false,
        }
    }

    /// Clamp a client-supplied state into the catalog's bounds.
    pub fn normalized(self, steps: &StepCatalog) -> Self {
        Self {
            current_step: self.current_step.min(steps.last_index()),
            ..self
        }
    }

    /// Clamp the state, then pull it back to the first step whose answers
    /// do not validate. Review and submitted require every step to pass.
    pub fn reconciled(self, steps: &StepCatalog, answers: &FormAnswers) -> Self {
        let state = self.normalized(steps);
        let passed = match state.status {
            WorkflowStatus::Editing => state.current_step,
            WorkflowStatus::Review | WorkflowStatus::Submitted => steps.len(),
        };

        match (0..passed).find(|index| !is_step_valid(steps.at(*index), answers)) {
            Some(index) => Self {
                current_step: index,
                status: WorkflowStatus::Editing,
                show_validation: false,
            },
            None => state,
        }
    }

    pub fn next(&self, steps: &StepCatalog, answers: &FormAnswers) -> Transition {
        match self.status {
            WorkflowStatus::Submitted => return self.rejected(RejectionReason::Finished),
            WorkflowStatus::Review => return self.rejected(RejectionReason::NotEditing),
            WorkflowStatus::Editing => {}
        }

        let step = steps.at(self.current_step);
        if !is_step_valid(step, answers) {
            return Transition {
                state: Self {
                    show_validation: true,
                    ..*self
                },
                outcome: TransitionOutcome::Blocked {
                    step: step.id,
                    missing: missing_fields(step, answers),
                },
            };
        }

        if self.current_step >= steps.last_index() {
            return Transition {
                state: Self {
                    current_step: steps.last_index(),
                    status: WorkflowStatus::Review,
                    show_validation: false,
                },
                outcome: TransitionOutcome::EnteredReview,
            };
        }

        let to = self.current_step + 1;
        Transition {
            state: Self {
                current_step: to,
                status: WorkflowStatus::Editing,
                show_validation: false,
            },
            outcome: TransitionOutcome::Advanced {
                from: self.current_step,
                to,
            },
        }
    }

    pub fn previous(&self, steps: &StepCatalog) -> Transition {
        match self.status {
            WorkflowStatus::Submitted => self.rejected(RejectionReason::Finished),
            WorkflowStatus::Review => Transition {
                state: Self {
                    current_step: steps.last_index(),
                    status: WorkflowStatus::Editing,
                    show_validation: false,
                },
                outcome: TransitionOutcome::ReturnedToEditing {
                    step: steps.last_index(),
                },
            },
            WorkflowStatus::Editing => {
                let to = self.current_step.saturating_sub(1);
                Transition {
                    state: Self {
                        current_step: to,
                        status: WorkflowStatus::Editing,
                        show_validation: false,
                    },
                    outcome: TransitionOutcome::Retreated { to },
                }
            }
        }
    }

    pub fn go_to(&self, index: usize) -> Transition {
        if self.status == WorkflowStatus::Submitted {
            return self.rejected(RejectionReason::Finished);
        }
        if index > self.current_step {
            return self.rejected(RejectionReason::ForwardJump);
        }

        Transition {
            state: Self {
                current_step: index,
                status: WorkflowStatus::Editing,
                show_validation: false,
            },
            outcome: TransitionOutcome::Jumped { to: index },
        }
    }

    pub fn submit(&self) -> Transition {
        match self.status {
            WorkflowStatus::Review => Transition {
                state: Self {
                    status: WorkflowStatus::Submitted,
                    show_validation: false,
                    ..*self
                },
                outcome: TransitionOutcome::Submitted,
            },
            WorkflowStatus::Submitted => self.rejected(RejectionReason::Finished),
            WorkflowStatus::Editing => self.rejected(RejectionReason::NotInReview),
        }
    }

    fn rejected(&self, reason: RejectionReason) -> Transition {
        Transition {
            state: *self,
            outcome: TransitionOutcome::Rejected { reason },
        }
    }
}

/// Any user intent the wizard reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowAction {
    UpdateField(FieldUpdate),
    Next,
    Previous,
    GoTo { index: usize },
    Submit,
}

impl WorkflowAction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UpdateField(_) => "update_field",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::GoTo { .. } => "go_to",
            Self::Submit => "submit",
        }
    }
}

/// Result of feeding one action through [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub state: WorkflowState,
    pub answers: FormAnswers,
    pub outcome: TransitionOutcome,
}

/// Apply one action to a state/answers pair.
///
/// The incoming state is reconciled against the answers first, so a state
/// that claims progress the answers do not back is pulled back to the first
/// failing step. Only a malformed field update is an error; everything else
/// resolves to
/// an outcome.
pub fn reduce(
    steps: &StepCatalog,
    state: &WorkflowState,
    answers: &FormAnswers,
    action: &WorkflowAction,
) -> Result<Reduction, FieldError> {
    let state = state.reconciled(steps, answers);

    let (transition, answers) = match action {
        WorkflowAction::UpdateField(update) => {
            if state.status != WorkflowStatus::Editing {
                let reason = if state.status == WorkflowStatus::Submitted {
                    RejectionReason::Finished
                } else {
                    RejectionReason::NotEditing
                };
                (state.rejected(reason), answers.clone())
            } else {
                let mut updated = answers.clone();
                updated.apply(update)?;
                let transition = Transition {
                    state,
                    outcome: TransitionOutcome::Updated {
                        field: update.field,
                    },
                };
                (transition, updated)
            }
        }
        WorkflowAction::Next => (state.next(steps, answers), answers.clone()),
        WorkflowAction::Previous => (state.previous(steps), answers.clone()),
        WorkflowAction::GoTo { index } => (state.go_to(*index), answers.clone()),
        WorkflowAction::Submit => (state.submit(), answers.clone()),
    };

    Ok(Reduction {
        state: transition.state,
        answers,
        outcome: transition.outcome,
    })
}
