use serde::{Deserialize, Serialize};

use super::answers::{DiscoveredVia, FieldKey, FormAnswers, ProjectType, PropertyType, YesNo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Profile,
    Project,
    Timeline,
    Market,
    Engagement,
    Validation,
}

impl StepId {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Project => "project",
            Self::Timeline => "timeline",
            Self::Market => "market",
            Self::Engagement => "engagement",
            Self::Validation => "validation",
        }
    }
}

/// A rule spanning several fields; returns `true` when satisfied.
pub type StepRule = fn(&FormAnswers) -> bool;

#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub id: StepId,
    pub label: &'static str,
    pub subtitle: &'static str,
    pub helper: &'static str,
    /// Inputs rendered on this step, in display order.
    pub fields: &'static [FieldKey],
    pub required: &'static [FieldKey],
    pub rule: Option<StepRule>,
}

/// Public summary of a step for clients building their own navigation.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub index: usize,
    pub id: StepId,
    pub label: &'static str,
    pub subtitle: &'static str,
    pub helper: &'static str,
    pub required: Vec<FieldKey>,
}

/// Ordered, immutable list of the qualification steps.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: Vec<StepDefinition>,
}

impl StepCatalog {
    pub fn standard() -> Self {
        Self {
            steps: standard_steps(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Step at `index`, clamped to the last step.
    pub fn at(&self, index: usize) -> &StepDefinition {
        &self.steps[index.min(self.last_index())]
    }

    pub fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn summaries(&self) -> Vec<StepSummary> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepSummary {
                index,
                id: step.id,
                label: step.label,
                subtitle: step.subtitle,
                helper: step.helper,
                required: step.required.to_vec(),
            })
            .collect()
    }
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn project_rule(answers: &FormAnswers) -> bool {
    if answers.project_type == Some(ProjectType::Other)
        && answers.project_type_other.trim().is_empty()
    {
        return false;
    }
    if answers.property_type == Some(PropertyType::Other)
        && answers.property_type_other.trim().is_empty()
    {
        return false;
    }
    true
}

fn market_rule(answers: &FormAnswers) -> bool {
    !(answers.contacted_agencies == Some(YesNo::Yes)
        && answers.contacted_agency_details.trim().is_empty())
}

fn engagement_rule(answers: &FormAnswers) -> bool {
    !(answers.discovered_via == Some(DiscoveredVia::Other)
        && answers.discovered_via_other.trim().is_empty())
}

fn validation_rule(answers: &FormAnswers) -> bool {
    answers.validation_accepted && answers.commitment_confirmed
}

fn standard_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition {
            id: StepId::Profile,
            label: "À propos de toi",
            subtitle: "Mieux te connaître pour ajuster notre premier échange.",
            helper: "Identité & contact privilégié.",
            fields: &[
                FieldKey::FullName,
                FieldKey::Email,
                FieldKey::Phone,
                FieldKey::ContactPreference,
                FieldKey::HasExperience,
            ],
            required: &[
                FieldKey::FullName,
                FieldKey::Email,
                FieldKey::Phone,
                FieldKey::ContactPreference,
                FieldKey::HasExperience,
            ],
            rule: None,
        },
        StepDefinition {
            id: StepId::Project,
            label: "Ton projet",
            subtitle: "Comprendre le contexte précis de ton bien ou de ta recherche.",
            helper: "Localisation, type de bien, état & motivation.",
            fields: &[
                FieldKey::ProjectType,
                FieldKey::ProjectTypeOther,
                FieldKey::ProjectLocation,
                FieldKey::PropertyType,
                FieldKey::PropertyTypeOther,
                FieldKey::PropertyDetails,
                FieldKey::PropertyCondition,
                FieldKey::Motivation,
            ],
            required: &[
                FieldKey::ProjectType,
                FieldKey::ProjectLocation,
                FieldKey::PropertyType,
                FieldKey::PropertyDetails,
                FieldKey::PropertyCondition,
                FieldKey::Motivation,
            ],
            rule: Some(project_rule),
        },
        StepDefinition {
            id: StepId::Timeline,
            label: "Timing & situation",
            subtitle: "Se caler sur ton agenda et ta capacité à avancer.",
            helper: "Calendrier & financement.",
            fields: &[
                FieldKey::Timeline,
                FieldKey::FinancingStatus,
                FieldKey::SellBeforeBuy,
            ],
            required: &[
                FieldKey::Timeline,
                FieldKey::FinancingStatus,
                FieldKey::SellBeforeBuy,
            ],
            rule: None,
        },
        StepDefinition {
            id: StepId::Market,
            label: "Infos marché",
            subtitle: "Situer ton projet sur le marché local.",
            helper: "Budget & démarches déjà réalisées.",
            fields: &[
                FieldKey::PriceExpectation,
                FieldKey::PriceEstimationMethod,
                FieldKey::ContactedAgencies,
                FieldKey::ContactedAgencyDetails,
            ],
            required: &[
                FieldKey::PriceExpectation,
                FieldKey::PriceEstimationMethod,
                FieldKey::ContactedAgencies,
            ],
            rule: Some(market_rule),
        },
        StepDefinition {
            id: StepId::Engagement,
            label: "Confiance & motivation",
            subtitle: "Pourquoi moi et quelle est ton énergie actuelle ?",
            helper: "Alignement humain & motivation.",
            fields: &[
                FieldKey::DiscoveredVia,
                FieldKey::DiscoveredViaOther,
                FieldKey::ReasonToWork,
                FieldKey::MotivationLevel,
            ],
            required: &[FieldKey::DiscoveredVia, FieldKey::ReasonToWork],
            rule: Some(engagement_rule),
        },
        StepDefinition {
            id: StepId::Validation,
            label: "Validation",
            subtitle: "On vérifie que l'accompagnement te correspond.",
            helper: "Engagement & disponibilité.",
            fields: &[
                FieldKey::CallbackPreference,
                FieldKey::ValidationAccepted,
                FieldKey::CommitmentConfirmed,
            ],
            required: &[FieldKey::CallbackPreference],
            rule: Some(validation_rule),
        },
    ]
}

/// Whether a conditional input is shown for the current answers.
pub fn is_field_visible(key: FieldKey, answers: &FormAnswers) -> bool {
    match key {
        FieldKey::ProjectTypeOther => answers.project_type == Some(ProjectType::Other),
        FieldKey::PropertyTypeOther => answers.property_type == Some(PropertyType::Other),
        FieldKey::ContactedAgencyDetails => answers.contacted_agencies == Some(YesNo::Yes),
        FieldKey::DiscoveredViaOther => answers.discovered_via == Some(DiscoveredVia::Other),
        _ => true,
    }
}
