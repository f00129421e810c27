//! Multi-step project qualification wizard.
//!
//! The answers, step catalog and reducer are pure; analytics, clipboard and
//! mail hand-off are reached through the ports in [`handoff`] and
//! [`crate::analytics`].

pub mod answers;
pub mod dossier;
pub mod handoff;
pub mod navigation;
pub mod router;
pub mod session;
pub mod steps;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use answers::{
    CallbackPreference, Choice, ContactPreference, DiscoveredVia, FieldError, FieldKey, FieldKind,
    FieldUpdate, FieldValue, FinancingStatus, FormAnswers, MotivationLevel, OptionView,
    PriceEstimationMethod, ProjectType, PropertyCondition, PropertyType, SellBeforeBuy, Timeline,
    YesNo,
};
pub use dossier::{build_dossier, display_value, review_sections, ReviewItem, ReviewSection};
pub use handoff::{
    copy_dossier, dossier_mailto, mailto_link, Clipboard, ClipboardError, CopyFeedback,
    DOSSIER_MAIL_SUBJECT,
};
pub use navigation::{
    reduce, Reduction, RejectionReason, Transition, TransitionOutcome, WorkflowAction,
    WorkflowState, WorkflowStatus,
};
pub use router::{qualification_router, QualificationService};
pub use session::QualificationSession;
pub use steps::{StepCatalog, StepDefinition, StepId, StepSummary};
pub use validation::{is_step_valid, missing_fields};
pub use views::{render_text, ProjectionContext, WorkflowView};
