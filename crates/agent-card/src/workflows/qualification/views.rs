//! Serializable projection of the wizard for whatever renders it.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use super::answers::{FieldKey, FieldKind, FormAnswers, OptionView};
use super::dossier::{display_value, review_sections, ReviewItem};
use super::navigation::{WorkflowState, WorkflowStatus};
use super::steps::{is_field_visible, StepCatalog, StepId};
use super::validation::{is_step_valid, missing_fields};

/// Inputs the projection needs beyond state and answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionContext<'a> {
    /// Recipient of the "send me a copy" hand-off, when the contact has one.
    pub contact_email: Option<&'a str>,
    /// Whether a recent copy is still being acknowledged.
    pub copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub helper: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub label: String,
    pub caption: &'static str,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
    pub visible: bool,
    pub value: Value,
    pub display: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
    pub invalid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepPill {
    pub index: usize,
    pub number: usize,
    pub label: &'static str,
    pub current: bool,
    pub reachable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFormView {
    pub index: usize,
    pub step: StepId,
    pub kicker: String,
    pub title: &'static str,
    pub helper: &'static str,
    pub fields: Vec<FieldView>,
    pub pills: Vec<StepPill>,
    pub can_go_back: bool,
    pub back_label: &'static str,
    pub next_label: &'static str,
    pub footer_hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSectionView {
    pub title: &'static str,
    pub step: StepId,
    pub step_index: usize,
    pub editable: bool,
    pub items: Vec<ReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationView {
    pub title: &'static str,
    pub message: &'static str,
    pub copy_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub kicker: &'static str,
    pub title: &'static str,
    pub status_message: &'static str,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<&'static str>,
    pub sections: Vec<ReviewSectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyView {
    Step(StepFormView),
    Review(ReviewView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowView {
    pub status: WorkflowStatus,
    pub header: HeaderView,
    pub progress: ProgressView,
    pub body: BodyView,
}

const SUBMITTED_MESSAGE: &str = "Je vais analyser ton projet avec attention. Si ton dossier matche mes critères (zone Finistère & méthode), je te recontacte sous 24-72 h pour la suite. Tu reçois aussi une copie de ton dossier par email si tu te l'envoies via le bouton ci-dessous.";

impl WorkflowView {
    pub fn project(
        steps: &StepCatalog,
        state: &WorkflowState,
        answers: &FormAnswers,
        ctx: ProjectionContext<'_>,
    ) -> Self {
        let state = state.normalized(steps);
        let step = steps.at(state.current_step);
        let submitted = state.status == WorkflowStatus::Submitted;

        let header = if submitted {
            HeaderView {
                eyebrow: "Dossier reçu",
                title: "Merci, je prends le relais",
                subtitle: "Ton projet passe en revue personnelle.",
                helper: "Valeur validée",
            }
        } else {
            HeaderView {
                eyebrow: "Questionnaire sélection",
                title: step.label,
                subtitle: step.subtitle,
                helper: step.helper,
            }
        };

        let body = match state.status {
            WorkflowStatus::Editing => BodyView::Step(step_form(steps, &state, answers)),
            WorkflowStatus::Review | WorkflowStatus::Submitted => {
                BodyView::Review(review(steps, state.status, answers, ctx))
            }
        };

        Self {
            status: state.status,
            header,
            progress: progress(steps, &state),
            body,
        }
    }
}

fn progress(steps: &StepCatalog, state: &WorkflowState) -> ProgressView {
    let total = steps.len().max(1);
    let position = state.current_step + 1;
    let percent = match state.status {
        WorkflowStatus::Editing => {
            ((position as f64 / total as f64) * 100.0).round().min(100.0) as u8
        }
        WorkflowStatus::Review | WorkflowStatus::Submitted => 100,
    };
    let (label, caption) = if state.status == WorkflowStatus::Submitted {
        ("100%".to_string(), "Complet")
    } else {
        (format!("{position:02} / {total:02}"), "Sélection")
    };

    ProgressView {
        label,
        caption,
        percent,
    }
}

fn step_form(steps: &StepCatalog, state: &WorkflowState, answers: &FormAnswers) -> StepFormView {
    let step = steps.at(state.current_step);
    let missing = if state.show_validation {
        missing_fields(step, answers)
    } else {
        Vec::new()
    };

    let fields = step
        .fields
        .iter()
        .map(|key| {
            let invalid = missing.contains(key);
            FieldView {
                key: *key,
                label: key.label(),
                kind: key.kind(),
                visible: is_field_visible(*key, answers),
                value: answers.value(*key).to_json(),
                display: display_value(*key, answers),
                options: FormAnswers::options(*key),
                invalid,
                message: if invalid { validation_message(*key) } else { None },
            }
        })
        .collect();

    let pills = steps
        .steps()
        .iter()
        .enumerate()
        .map(|(index, definition)| StepPill {
            index,
            number: index + 1,
            label: definition.label,
            current: index == state.current_step,
            reachable: index <= state.current_step,
        })
        .collect();

    let blocked = state.show_validation && !is_step_valid(step, answers);

    StepFormView {
        index: state.current_step,
        step: step.id,
        kicker: format!("Étape {:02} · {}", state.current_step + 1, step.label),
        title: step.subtitle,
        helper: step.helper,
        fields,
        pills,
        can_go_back: state.current_step > 0,
        back_label: "Revenir en arrière",
        next_label: if state.current_step >= steps.last_index() {
            "Prévisualiser mon dossier"
        } else {
            "Étape suivante"
        },
        footer_hint: if blocked {
            "Complète les points en surbrillance pour continuer."
        } else {
            "Ton temps est précieux : 2 minutes suffisent si tu as déjà réfléchi à ton projet."
        },
    }
}

fn review(
    steps: &StepCatalog,
    status: WorkflowStatus,
    answers: &FormAnswers,
    ctx: ProjectionContext<'_>,
) -> ReviewView {
    let in_review = status == WorkflowStatus::Review;

    ReviewView {
        kicker: if in_review {
            "Relecture finale"
        } else {
            "Traitement en cours"
        },
        title: if in_review {
            "Garde 30 secondes pour relire"
        } else {
            "Je passe ton dossier au peigne fin"
        },
        status_message: if in_review {
            "Relis ton dossier avant de m'envoyer la version finale."
        } else {
            "Ton dossier est prêt. Je reviens vers toi sous 24-72 h si tout est aligné."
        },
        can_submit: in_review,
        submit_label: in_review.then_some("Soumettre mon projet"),
        sections: review_section_views(steps, status, answers),
        confirmation: (!in_review).then(|| ConfirmationView {
            title: "Merci pour ton envoi 🙏",
            message: SUBMITTED_MESSAGE,
            copy_label: if ctx.copied {
                "Copié ✅"
            } else {
                "Copier le dossier"
            },
            email_label: ctx.contact_email.map(|_| "S'envoyer une copie"),
        }),
    }
}

fn review_section_views(
    steps: &StepCatalog,
    status: WorkflowStatus,
    answers: &FormAnswers,
) -> Vec<ReviewSectionView> {
    review_sections(answers)
        .into_iter()
        .map(|section| ReviewSectionView {
            title: section.title,
            step: section.step,
            step_index: steps.position(section.step).unwrap_or(0),
            editable: status == WorkflowStatus::Review,
            items: section.items,
        })
        .collect()
}

/// Inline hint shown under a highlighted input, where the form has one.
pub fn validation_message(key: FieldKey) -> Option<&'static str> {
    let message = match key {
        FieldKey::ContactPreference => "Choisis ton canal préféré.",
        FieldKey::HasExperience => "Précise ton expérience immobilière.",
        FieldKey::ProjectType => "Sélectionne ton projet.",
        FieldKey::PropertyType => "Indique le type de bien.",
        FieldKey::PropertyCondition => "Sélectionne l'état du bien.",
        FieldKey::Motivation => "Décris ta motivation.",
        FieldKey::Timeline => "Choisis ton horizon temporel.",
        FieldKey::FinancingStatus => "Précise ton financement.",
        FieldKey::SellBeforeBuy => "Indique ta situation de vente.",
        FieldKey::PriceEstimationMethod => "Sélectionne la méthode utilisée.",
        FieldKey::ContactedAgencies => "Indique si tu as déjà sollicité d'autres agences.",
        FieldKey::DiscoveredVia => "Indique la source du contact.",
        FieldKey::ReasonToWork => "C'est la question clé : partage ta raison.",
        FieldKey::CallbackPreference => "Précise si tu souhaites un rappel.",
        FieldKey::ValidationAccepted => "Accepte les conditions de sélection.",
        FieldKey::CommitmentConfirmed => "Confirme le sérieux et la localisation du projet.",
        _ => return None,
    };
    Some(message)
}

/// Plain-text rendering for terminals.
pub fn render_text(view: &WorkflowView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", view.header.eyebrow, view.header.title);
    let _ = writeln!(out, "{}", view.header.subtitle);
    let _ = writeln!(
        out,
        "{} · {} · {}%",
        view.progress.label, view.progress.caption, view.progress.percent
    );
    let _ = writeln!(out);

    match &view.body {
        BodyView::Step(form) => {
            let _ = writeln!(out, "{}", form.kicker);
            for field in form.fields.iter().filter(|field| field.visible) {
                let marker = if field.invalid { "!" } else { " " };
                let _ = writeln!(out, "{marker} {} : {}", field.label, field.display);
                if let Some(message) = field.message {
                    let _ = writeln!(out, "    {message}");
                }
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", form.footer_hint);
        }
        BodyView::Review(review) => {
            let _ = writeln!(out, "{} · {}", review.kicker, review.title);
            let _ = writeln!(out, "{}", review.status_message);
            for section in &review.sections {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", section.title);
                for item in &section.items {
                    let _ = writeln!(out, "  {} : {}", item.label, item.value);
                }
            }
            if let Some(confirmation) = &review.confirmation {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", confirmation.title);
                let _ = writeln!(out, "{}", confirmation.message);
            }
        }
    }

    out
}
