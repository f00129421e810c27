use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of options for a single-choice field.
pub trait Choice: Copy + PartialEq + 'static {
    fn ordered() -> &'static [Self];
    fn code(self) -> &'static str;
    fn label(self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .iter()
            .copied()
            .find(|option| option.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPreference {
    Phone,
    Sms,
    Email,
}

impl Choice for ContactPreference {
    fn ordered() -> &'static [Self] {
        &[Self::Phone, Self::Sms, Self::Email]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Sms => "sms",
            Self::Email => "email",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Phone => "Téléphone",
            Self::Sms => "SMS",
            Self::Email => "Email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    fn ordered() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Oui",
            Self::No => "Non",
        }
    }
}

/// Same codes as [`YesNo`], but "no" means the lead only wants information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPreference {
    Yes,
    No,
}

impl Choice for CallbackPreference {
    fn ordered() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Oui",
            Self::No => "Non, juste des infos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Sell,
    Estimate,
    Buy,
    Invest,
    Other,
}

impl Choice for ProjectType {
    fn ordered() -> &'static [Self] {
        &[
            Self::Sell,
            Self::Estimate,
            Self::Buy,
            Self::Invest,
            Self::Other,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Estimate => "estimate",
            Self::Buy => "buy",
            Self::Invest => "invest",
            Self::Other => "other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Sell => "Vendre un bien",
            Self::Estimate => "Faire estimer mon bien",
            Self::Buy => "Acheter pour y habiter",
            Self::Invest => "Investir (locatif)",
            Self::Other => "Autre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    House,
    Apartment,
    Building,
    Land,
    Commercial,
    Other,
}

impl Choice for PropertyType {
    fn ordered() -> &'static [Self] {
        &[
            Self::House,
            Self::Apartment,
            Self::Building,
            Self::Land,
            Self::Commercial,
            Self::Other,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Building => "building",
            Self::Land => "land",
            Self::Commercial => "commercial",
            Self::Other => "other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::House => "Maison",
            Self::Apartment => "Appartement",
            Self::Building => "Immeuble",
            Self::Land => "Terrain",
            Self::Commercial => "Local commercial",
            Self::Other => "Autre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyCondition {
    New,
    Good,
    LightWork,
    HeavyWork,
    FullRenovation,
}

impl Choice for PropertyCondition {
    fn ordered() -> &'static [Self] {
        &[
            Self::New,
            Self::Good,
            Self::LightWork,
            Self::HeavyWork,
            Self::FullRenovation,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Good => "good",
            Self::LightWork => "light",
            Self::HeavyWork => "heavy",
            Self::FullRenovation => "full",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::New => "Neuf",
            Self::Good => "Bon état",
            Self::LightWork => "Travaux légers",
            Self::HeavyWork => "Travaux lourds",
            Self::FullRenovation => "À rénover entièrement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    Now,
    Soon,
    Later,
    Thinking,
}

impl Choice for Timeline {
    fn ordered() -> &'static [Self] {
        &[Self::Now, Self::Soon, Self::Later, Self::Thinking]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::Soon => "soon",
            Self::Later => "later",
            Self::Thinking => "thinking",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Now => "Immédiat (0-3 mois)",
            Self::Soon => "Prévu bientôt (3-6 mois)",
            Self::Later => "Plus tard (6-12 mois)",
            Self::Thinking => "En réflexion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancingStatus {
    Approved,
    InProgress,
    NotYet,
    Cash,
}

impl Choice for FinancingStatus {
    fn ordered() -> &'static [Self] {
        &[Self::Approved, Self::InProgress, Self::NotYet, Self::Cash]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::InProgress => "progress",
            Self::NotYet => "none",
            Self::Cash => "cash",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Approved => "Oui, accord bancaire",
            Self::InProgress => "Oui, en cours",
            Self::NotYet => "Non, pas encore",
            Self::Cash => "Je finance cash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellBeforeBuy {
    Yes,
    No,
    NotApplicable,
}

impl Choice for SellBeforeBuy {
    fn ordered() -> &'static [Self] {
        &[Self::Yes, Self::No, Self::NotApplicable]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::NotApplicable => "na",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Yes => "Oui",
            Self::No => "Non",
            Self::NotApplicable => "Pas concerné",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceEstimationMethod {
    Professional,
    Personal,
    Comparison,
    Intuition,
}

impl Choice for PriceEstimationMethod {
    fn ordered() -> &'static [Self] {
        &[
            Self::Professional,
            Self::Personal,
            Self::Comparison,
            Self::Intuition,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Professional => "pro",
            Self::Personal => "personal",
            Self::Comparison => "comparison",
            Self::Intuition => "intuition",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Professional => "Estimation professionnelle",
            Self::Personal => "Analyse personnelle",
            Self::Comparison => "Comparaison de biens",
            Self::Intuition => "Intuition / aucun calcul",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveredVia {
    Instagram,
    Recommendation,
    Google,
    Agency,
    Other,
}

impl Choice for DiscoveredVia {
    fn ordered() -> &'static [Self] {
        &[
            Self::Instagram,
            Self::Recommendation,
            Self::Google,
            Self::Agency,
            Self::Other,
        ]
    }

    fn code(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Recommendation => "recommendation",
            Self::Google => "google",
            Self::Agency => "agency",
            Self::Other => "other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::Recommendation => "Recommandation",
            Self::Google => "Google",
            Self::Agency => "Agence ALV",
            Self::Other => "Autre",
        }
    }
}

/// Self-assessed motivation on a 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MotivationLevel(u8);

impl MotivationLevel {
    pub const MAX: u8 = 10;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for MotivationLevel {
    fn default() -> Self {
        Self(7)
    }
}

impl TryFrom<u8> for MotivationLevel {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(FieldError::OutOfRange {
                field: FieldKey::MotivationLevel,
                value: u64::from(value),
            });
        }
        Ok(Self(value))
    }
}

impl From<MotivationLevel> for u8 {
    fn from(value: MotivationLevel) -> Self {
        value.0
    }
}

/// Every answer the qualification form collects. Unanswered choices are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormAnswers {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "choice_code")]
    pub contact_preference: Option<ContactPreference>,
    #[serde(with = "choice_code")]
    pub has_experience: Option<YesNo>,
    #[serde(with = "choice_code")]
    pub project_type: Option<ProjectType>,
    pub project_type_other: String,
    pub project_location: String,
    #[serde(with = "choice_code")]
    pub property_type: Option<PropertyType>,
    pub property_type_other: String,
    pub property_details: String,
    #[serde(with = "choice_code")]
    pub property_condition: Option<PropertyCondition>,
    pub motivation: String,
    #[serde(with = "choice_code")]
    pub timeline: Option<Timeline>,
    #[serde(with = "choice_code")]
    pub financing_status: Option<FinancingStatus>,
    #[serde(with = "choice_code")]
    pub sell_before_buy: Option<SellBeforeBuy>,
    pub price_expectation: String,
    #[serde(with = "choice_code")]
    pub price_estimation_method: Option<PriceEstimationMethod>,
    #[serde(with = "choice_code")]
    pub contacted_agencies: Option<YesNo>,
    pub contacted_agency_details: String,
    #[serde(with = "choice_code")]
    pub discovered_via: Option<DiscoveredVia>,
    pub discovered_via_other: String,
    pub reason_to_work: String,
    pub motivation_level: MotivationLevel,
    #[serde(with = "choice_code")]
    pub callback_preference: Option<CallbackPreference>,
    pub validation_accepted: bool,
    pub commitment_confirmed: bool,
}

impl Default for FormAnswers {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            contact_preference: None,
            has_experience: None,
            project_type: None,
            project_type_other: String::new(),
            project_location: String::new(),
            property_type: None,
            property_type_other: String::new(),
            property_details: String::new(),
            property_condition: None,
            motivation: String::new(),
            timeline: None,
            financing_status: None,
            sell_before_buy: None,
            price_expectation: String::new(),
            price_estimation_method: None,
            contacted_agencies: None,
            contacted_agency_details: String::new(),
            discovered_via: None,
            discovered_via_other: String::new(),
            reason_to_work: String::new(),
            motivation_level: MotivationLevel::default(),
            callback_preference: None,
            validation_accepted: false,
            commitment_confirmed: false,
        }
    }
}

/// Identifier of every field in [`FormAnswers`]; serialized with the form's camelCase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    Email,
    Phone,
    ContactPreference,
    HasExperience,
    ProjectType,
    ProjectTypeOther,
    ProjectLocation,
    PropertyType,
    PropertyTypeOther,
    PropertyDetails,
    PropertyCondition,
    Motivation,
    Timeline,
    FinancingStatus,
    SellBeforeBuy,
    PriceExpectation,
    PriceEstimationMethod,
    ContactedAgencies,
    ContactedAgencyDetails,
    DiscoveredVia,
    DiscoveredViaOther,
    ReasonToWork,
    MotivationLevel,
    CallbackPreference,
    ValidationAccepted,
    CommitmentConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Choice,
    Flag,
    Scale,
}

impl FieldKind {
    const fn expected(self) -> &'static str {
        match self {
            Self::Text | Self::Choice => "a string",
            Self::Flag => "a boolean",
            Self::Scale => "an integer between 0 and 10",
        }
    }
}

impl FieldKey {
    pub const fn code(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::ContactPreference => "contactPreference",
            Self::HasExperience => "hasExperience",
            Self::ProjectType => "projectType",
            Self::ProjectTypeOther => "projectTypeOther",
            Self::ProjectLocation => "projectLocation",
            Self::PropertyType => "propertyType",
            Self::PropertyTypeOther => "propertyTypeOther",
            Self::PropertyDetails => "propertyDetails",
            Self::PropertyCondition => "propertyCondition",
            Self::Motivation => "motivation",
            Self::Timeline => "timeline",
            Self::FinancingStatus => "financingStatus",
            Self::SellBeforeBuy => "sellBeforeBuy",
            Self::PriceExpectation => "priceExpectation",
            Self::PriceEstimationMethod => "priceEstimationMethod",
            Self::ContactedAgencies => "contactedAgencies",
            Self::ContactedAgencyDetails => "contactedAgencyDetails",
            Self::DiscoveredVia => "discoveredVia",
            Self::DiscoveredViaOther => "discoveredViaOther",
            Self::ReasonToWork => "reasonToWork",
            Self::MotivationLevel => "motivationLevel",
            Self::CallbackPreference => "callbackPreference",
            Self::ValidationAccepted => "validationAccepted",
            Self::CommitmentConfirmed => "commitmentConfirmed",
        }
    }

    /// Form label shown next to the input.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Prénom & nom",
            Self::Email => "Email",
            Self::Phone => "Téléphone",
            Self::ContactPreference => "Préférence de contact",
            Self::HasExperience => "Déjà vendu ou acheté un bien ?",
            Self::ProjectType => "Nature du projet",
            Self::ProjectTypeOther => "Précise ton projet",
            Self::ProjectLocation => "Adresse ou zone",
            Self::PropertyType => "Type de bien",
            Self::PropertyTypeOther => "Précise le type de bien",
            Self::PropertyDetails => "Caractéristiques",
            Self::PropertyCondition => "État du bien",
            Self::Motivation => "Motivation principale",
            Self::Timeline => "Calendrier idéal",
            Self::FinancingStatus => "Financement",
            Self::SellBeforeBuy => "Vendre avant d'acheter ?",
            Self::PriceExpectation => "Prix / budget envisagé",
            Self::PriceEstimationMethod => "Méthode d'estimation",
            Self::ContactedAgencies => "Déjà contacté d'autres agences ?",
            Self::ContactedAgencyDetails => "Lesquelles et où en es-tu ?",
            Self::DiscoveredVia => "Comment m'as-tu découvert ?",
            Self::DiscoveredViaOther => "Précise",
            Self::ReasonToWork => "Pourquoi travailler ensemble ?",
            Self::MotivationLevel => "Niveau de motivation",
            Self::CallbackPreference => "Souhaites-tu être rappelé ?",
            Self::ValidationAccepted => {
                "J'accepte que mon dossier soit étudié avant tout accompagnement."
            }
            Self::CommitmentConfirmed => {
                "Je confirme que mon projet est sérieux et situé dans le Finistère."
            }
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::FullName
            | Self::Email
            | Self::Phone
            | Self::ProjectTypeOther
            | Self::ProjectLocation
            | Self::PropertyTypeOther
            | Self::PropertyDetails
            | Self::Motivation
            | Self::PriceExpectation
            | Self::ContactedAgencyDetails
            | Self::DiscoveredViaOther
            | Self::ReasonToWork => FieldKind::Text,
            Self::ContactPreference
            | Self::HasExperience
            | Self::ProjectType
            | Self::PropertyType
            | Self::PropertyCondition
            | Self::Timeline
            | Self::FinancingStatus
            | Self::SellBeforeBuy
            | Self::PriceEstimationMethod
            | Self::ContactedAgencies
            | Self::DiscoveredVia
            | Self::CallbackPreference => FieldKind::Choice,
            Self::ValidationAccepted | Self::CommitmentConfirmed => FieldKind::Flag,
            Self::MotivationLevel => FieldKind::Scale,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Borrowed view of a single answer, typed by field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Choice(Option<ChoiceValue>),
    Flag(bool),
    Scale(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceValue {
    pub code: &'static str,
    pub label: &'static str,
}

impl ChoiceValue {
    fn of<C: Choice>(option: Option<C>) -> Option<Self> {
        option.map(|option| Self {
            code: option.code(),
            label: option.label(),
        })
    }
}

/// Selectable option for a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub code: &'static str,
    pub label: &'static str,
}

fn options_of<C: Choice>() -> Vec<OptionView> {
    C::ordered()
        .iter()
        .map(|option| OptionView {
            code: option.code(),
            label: option.label(),
        })
        .collect()
}

impl FieldValue<'_> {
    /// Presence rule used by step validation: trimmed text, an answered
    /// choice, a checked flag; a scale always counts as answered.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::Choice(choice) => choice.is_some(),
            FieldValue::Flag(flag) => *flag,
            FieldValue::Scale(_) => true,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::from(*text),
            FieldValue::Choice(choice) => Value::from(choice.map(|c| c.code).unwrap_or("")),
            FieldValue::Flag(flag) => Value::from(*flag),
            FieldValue::Scale(level) => Value::from(*level),
        }
    }
}

/// Single-field mutation as sent by the client: `{ "field": "...", "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub field: FieldKey,
    pub value: Value,
}

impl FieldUpdate {
    pub fn new(field: FieldKey, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field '{field}' expects {expected}")]
    WrongType {
        field: FieldKey,
        expected: &'static str,
    },
    #[error("field '{field}' has no option '{code}'")]
    UnknownOption { field: FieldKey, code: String },
    #[error("field '{field}' accepts values up to 10, got {value}")]
    OutOfRange { field: FieldKey, value: u64 },
}

impl FormAnswers {
    pub fn value(&self, key: FieldKey) -> FieldValue<'_> {
        match key {
            FieldKey::FullName => FieldValue::Text(&self.full_name),
            FieldKey::Email => FieldValue::Text(&self.email),
            FieldKey::Phone => FieldValue::Text(&self.phone),
            FieldKey::ContactPreference => {
                FieldValue::Choice(ChoiceValue::of(self.contact_preference))
            }
            FieldKey::HasExperience => FieldValue::Choice(ChoiceValue::of(self.has_experience)),
            FieldKey::ProjectType => FieldValue::Choice(ChoiceValue::of(self.project_type)),
            FieldKey::ProjectTypeOther => FieldValue::Text(&self.project_type_other),
            FieldKey::ProjectLocation => FieldValue::Text(&self.project_location),
            FieldKey::PropertyType => FieldValue::Choice(ChoiceValue::of(self.property_type)),
            FieldKey::PropertyTypeOther => FieldValue::Text(&self.property_type_other),
            FieldKey::PropertyDetails => FieldValue::Text(&self.property_details),
            FieldKey::PropertyCondition => {
                FieldValue::Choice(ChoiceValue::of(self.property_condition))
            }
            FieldKey::Motivation => FieldValue::Text(&self.motivation),
            FieldKey::Timeline => FieldValue::Choice(ChoiceValue::of(self.timeline)),
            FieldKey::FinancingStatus => {
                FieldValue::Choice(ChoiceValue::of(self.financing_status))
            }
            FieldKey::SellBeforeBuy => FieldValue::Choice(ChoiceValue::of(self.sell_before_buy)),
            FieldKey::PriceExpectation => FieldValue::Text(&self.price_expectation),
            FieldKey::PriceEstimationMethod => {
                FieldValue::Choice(ChoiceValue::of(self.price_estimation_method))
            }
            FieldKey::ContactedAgencies => {
                FieldValue::Choice(ChoiceValue::of(self.contacted_agencies))
            }
            FieldKey::ContactedAgencyDetails => FieldValue::Text(&self.contacted_agency_details),
            FieldKey::DiscoveredVia => FieldValue::Choice(ChoiceValue::of(self.discovered_via)),
            FieldKey::DiscoveredViaOther => FieldValue::Text(&self.discovered_via_other),
            FieldKey::ReasonToWork => FieldValue::Text(&self.reason_to_work),
            FieldKey::MotivationLevel => FieldValue::Scale(self.motivation_level.value()),
            FieldKey::CallbackPreference => {
                FieldValue::Choice(ChoiceValue::of(self.callback_preference))
            }
            FieldKey::ValidationAccepted => FieldValue::Flag(self.validation_accepted),
            FieldKey::CommitmentConfirmed => FieldValue::Flag(self.commitment_confirmed),
        }
    }

    /// Options offered for a choice field; empty for every other kind.
    pub fn options(key: FieldKey) -> Vec<OptionView> {
        match key {
            FieldKey::ContactPreference => options_of::<ContactPreference>(),
            FieldKey::HasExperience | FieldKey::ContactedAgencies => options_of::<YesNo>(),
            FieldKey::ProjectType => options_of::<ProjectType>(),
            FieldKey::PropertyType => options_of::<PropertyType>(),
            FieldKey::PropertyCondition => options_of::<PropertyCondition>(),
            FieldKey::Timeline => options_of::<Timeline>(),
            FieldKey::FinancingStatus => options_of::<FinancingStatus>(),
            FieldKey::SellBeforeBuy => options_of::<SellBeforeBuy>(),
            FieldKey::PriceEstimationMethod => options_of::<PriceEstimationMethod>(),
            FieldKey::DiscoveredVia => options_of::<DiscoveredVia>(),
            FieldKey::CallbackPreference => options_of::<CallbackPreference>(),
            _ => Vec::new(),
        }
    }

    /// Apply one update in place. The answers are untouched when the update is rejected.
    pub fn apply(&mut self, update: &FieldUpdate) -> Result<(), FieldError> {
        let key = update.field;
        match key.kind() {
            FieldKind::Text => {
                let text = expect_str(key, &update.value)?.to_string();
                *self.text_slot(key) = text;
            }
            FieldKind::Flag => {
                let flag = update.value.as_bool().ok_or(FieldError::WrongType {
                    field: key,
                    expected: FieldKind::Flag.expected(),
                })?;
                match key {
                    FieldKey::ValidationAccepted => self.validation_accepted = flag,
                    _ => self.commitment_confirmed = flag,
                }
            }
            FieldKind::Scale => {
                let raw = update.value.as_u64().ok_or(FieldError::WrongType {
                    field: key,
                    expected: FieldKind::Scale.expected(),
                })?;
                let level = u8::try_from(raw)
                    .map_err(|_| FieldError::OutOfRange { field: key, value: raw })
                    .and_then(MotivationLevel::try_from)?;
                self.motivation_level = level;
            }
            FieldKind::Choice => {
                let code = expect_str(key, &update.value)?;
                match key {
                    FieldKey::ContactPreference => {
                        self.contact_preference = parse_choice(key, code)?
                    }
                    FieldKey::HasExperience => self.has_experience = parse_choice(key, code)?,
                    FieldKey::ProjectType => self.project_type = parse_choice(key, code)?,
                    FieldKey::PropertyType => self.property_type = parse_choice(key, code)?,
                    FieldKey::PropertyCondition => {
                        self.property_condition = parse_choice(key, code)?
                    }
                    FieldKey::Timeline => self.timeline = parse_choice(key, code)?,
                    FieldKey::FinancingStatus => self.financing_status = parse_choice(key, code)?,
                    FieldKey::SellBeforeBuy => self.sell_before_buy = parse_choice(key, code)?,
                    FieldKey::PriceEstimationMethod => {
                        self.price_estimation_method = parse_choice(key, code)?
                    }
                    FieldKey::ContactedAgencies => {
                        self.contacted_agencies = parse_choice(key, code)?
                    }
                    FieldKey::DiscoveredVia => self.discovered_via = parse_choice(key, code)?,
                    _ => self.callback_preference = parse_choice(key, code)?,
                }
            }
        }
        Ok(())
    }

    fn text_slot(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::FullName => &mut self.full_name,
            FieldKey::Email => &mut self.email,
            FieldKey::Phone => &mut self.phone,
            FieldKey::ProjectTypeOther => &mut self.project_type_other,
            FieldKey::ProjectLocation => &mut self.project_location,
            FieldKey::PropertyTypeOther => &mut self.property_type_other,
            FieldKey::PropertyDetails => &mut self.property_details,
            FieldKey::Motivation => &mut self.motivation,
            FieldKey::PriceExpectation => &mut self.price_expectation,
            FieldKey::ContactedAgencyDetails => &mut self.contacted_agency_details,
            FieldKey::DiscoveredViaOther => &mut self.discovered_via_other,
            _ => &mut self.reason_to_work,
        }
    }
}

fn expect_str(key: FieldKey, value: &Value) -> Result<&str, FieldError> {
    value.as_str().ok_or(FieldError::WrongType {
        field: key,
        expected: key.kind().expected(),
    })
}

fn parse_choice<C: Choice>(key: FieldKey, code: &str) -> Result<Option<C>, FieldError> {
    let code = code.trim();
    if code.is_empty() {
        return Ok(None);
    }
    C::from_code(code)
        .map(Some)
        .ok_or_else(|| FieldError::UnknownOption {
            field: key,
            code: code.to_string(),
        })
}

/// Serde adapter: choices travel as their code, unanswered as `""` (or `null` on input).
mod choice_code {
    use super::Choice;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, C>(value: &Option<C>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        C: Choice,
    {
        serializer.serialize_str(value.map(C::code).unwrap_or(""))
    }

    pub fn deserialize<'de, D, C>(deserializer: D) -> Result<Option<C>, D::Error>
    where
        D: Deserializer<'de>,
        C: Choice,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => C::from_code(code)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unknown option '{code}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_fresh_form() {
        let answers = FormAnswers::default();
        assert_eq!(answers.motivation_level.value(), 7);
        assert!(answers.project_type.is_none());
        assert!(!answers.validation_accepted);
    }

    #[test]
    fn deserializes_camel_case_and_empty_choices() {
        let answers: FormAnswers = serde_json::from_value(json!({
            "fullName": "Léa Martin",
            "projectType": "other",
            "timeline": "",
            "sellBeforeBuy": "na",
            "motivationLevel": 0
        }))
        .expect("answers parse");

        assert_eq!(answers.full_name, "Léa Martin");
        assert_eq!(answers.project_type, Some(ProjectType::Other));
        assert_eq!(answers.timeline, None);
        assert_eq!(answers.sell_before_buy, Some(SellBeforeBuy::NotApplicable));
        assert_eq!(answers.motivation_level.value(), 0);
        assert_eq!(answers.email, "");
    }

    #[test]
    fn rejects_unknown_codes_and_out_of_range_scale() {
        let unknown = serde_json::from_value::<FormAnswers>(json!({ "timeline": "yesterday" }));
        assert!(unknown.is_err());

        let too_high = serde_json::from_value::<FormAnswers>(json!({ "motivationLevel": 11 }));
        assert!(too_high.is_err());
    }

    #[test]
    fn serializes_unanswered_choices_as_empty_codes() {
        let json = serde_json::to_value(FormAnswers::default()).expect("serializes");
        assert_eq!(json["projectType"], "");
        assert_eq!(json["motivationLevel"], 7);
        assert_eq!(json["validationAccepted"], false);
    }

    #[test]
    fn apply_updates_each_field_kind() {
        let mut answers = FormAnswers::default();
        answers
            .apply(&FieldUpdate::new(FieldKey::Phone, "06 00 00 00 00"))
            .expect("text");
        answers
            .apply(&FieldUpdate::new(FieldKey::FinancingStatus, "cash"))
            .expect("choice");
        answers
            .apply(&FieldUpdate::new(FieldKey::CommitmentConfirmed, true))
            .expect("flag");
        answers
            .apply(&FieldUpdate::new(FieldKey::MotivationLevel, 10))
            .expect("scale");

        assert_eq!(answers.phone, "06 00 00 00 00");
        assert_eq!(answers.financing_status, Some(FinancingStatus::Cash));
        assert!(answers.commitment_confirmed);
        assert_eq!(answers.motivation_level.value(), 10);

        answers
            .apply(&FieldUpdate::new(FieldKey::FinancingStatus, ""))
            .expect("clearing a choice");
        assert_eq!(answers.financing_status, None);
    }

    #[test]
    fn apply_rejects_malformed_updates_without_mutation() {
        let mut answers = FormAnswers::default();
        let before = answers.clone();

        assert_eq!(
            answers.apply(&FieldUpdate::new(FieldKey::Timeline, "someday")),
            Err(FieldError::UnknownOption {
                field: FieldKey::Timeline,
                code: "someday".to_string()
            })
        );
        assert!(matches!(
            answers.apply(&FieldUpdate::new(FieldKey::FullName, 42)),
            Err(FieldError::WrongType { .. })
        ));
        assert_eq!(
            answers.apply(&FieldUpdate::new(FieldKey::MotivationLevel, 300)),
            Err(FieldError::OutOfRange {
                field: FieldKey::MotivationLevel,
                value: 300
            })
        );
        assert_eq!(answers, before);
    }

    #[test]
    fn field_keys_round_trip_through_their_codes() {
        let key: FieldKey = serde_json::from_value(json!("contactedAgencyDetails")).expect("key");
        assert_eq!(key, FieldKey::ContactedAgencyDetails);
        assert_eq!(key.code(), "contactedAgencyDetails");
        assert_eq!(key.kind(), FieldKind::Text);
    }

    #[test]
    fn presence_rule_per_kind() {
        assert!(!FieldValue::Text("   ").is_present());
        assert!(FieldValue::Text(" x ").is_present());
        assert!(!FieldValue::Choice(None).is_present());
        assert!(!FieldValue::Flag(false).is_present());
        assert!(FieldValue::Scale(0).is_present());
    }
}
