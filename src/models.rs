/*!
 * Domain models shared by the translation pipeline and the store adapters.
 *
 * All records serialize with the field names used by the persisted JSON
 * documents, so data written by earlier versions loads unchanged.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the built-in translation context
pub const DEFAULT_CONTEXT_NAME: &str = "Expert";

/// Instruction text of the built-in translation context
pub const DEFAULT_CONTEXT_PROMPT: &str = "Translate the following text professionally and accurately, maintaining proper grammar, terminology, and formal tone suitable for professional contexts.";

/// Default chat-completion endpoint
pub const DEFAULT_API_LINK: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_AI_MODEL: &str = "openai/gpt-3.5-turbo";

/// Current timestamp in the ISO-8601 form used by every record
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// User settings persisted under a single key
///
/// Missing fields fall back to their defaults when loading, which gives the
/// shallow "defaults merged with stored record" behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "motherlanguage")]
    pub mother_language: String,

    #[serde(rename = "secondlanguage")]
    pub second_language: String,

    #[serde(rename = "learninglanguage")]
    pub learning_language: String,

    #[serde(rename = "apiLink")]
    pub api_link: String,

    #[serde(rename = "apiKey")]
    pub api_key: String,

    #[serde(rename = "aiModel")]
    pub ai_model: String,

    #[serde(rename = "selectedContext")]
    pub selected_context: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mother_language: "en".to_string(),
            second_language: "sq".to_string(),
            learning_language: "es".to_string(),
            api_link: DEFAULT_API_LINK.to_string(),
            api_key: String::new(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            selected_context: DEFAULT_CONTEXT_NAME.to_string(),
        }
    }
}

impl Settings {
    /// The three configured languages in configured order
    pub fn configured_languages(&self) -> [&str; 3] {
        [
            self.mother_language.as_str(),
            self.second_language.as_str(),
            self.learning_language.as_str(),
        ]
    }

    /// Apply a partial update on top of these settings
    pub fn merge(&mut self, update: SettingsUpdate) {
        if let Some(value) = update.mother_language {
            self.mother_language = value;
        }
        if let Some(value) = update.second_language {
            self.second_language = value;
        }
        if let Some(value) = update.learning_language {
            self.learning_language = value;
        }
        if let Some(value) = update.api_link {
            self.api_link = value;
        }
        if let Some(value) = update.api_key {
            self.api_key = value;
        }
        if let Some(value) = update.ai_model {
            self.ai_model = value;
        }
        if let Some(value) = update.selected_context {
            self.selected_context = value;
        }
    }
}

/// Partial settings update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(rename = "motherlanguage", skip_serializing_if = "Option::is_none")]
    pub mother_language: Option<String>,
    #[serde(rename = "secondlanguage", skip_serializing_if = "Option::is_none")]
    pub second_language: Option<String>,
    #[serde(rename = "learninglanguage", skip_serializing_if = "Option::is_none")]
    pub learning_language: Option<String>,
    #[serde(rename = "apiLink", skip_serializing_if = "Option::is_none")]
    pub api_link: Option<String>,
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "aiModel", skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    #[serde(rename = "selectedContext", skip_serializing_if = "Option::is_none")]
    pub selected_context: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A named instruction prefix applied to translation prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub prompt: String,
}

impl Context {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
        }
    }

    /// The immutable built-in context
    pub fn builtin() -> Self {
        Self::new(DEFAULT_CONTEXT_NAME, DEFAULT_CONTEXT_PROMPT)
    }
}

/// Origin of a translation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationKind {
    /// Produced from text the user typed
    #[default]
    UserInput,
    /// Produced by example generation
    AiGenerated,
}

impl fmt::Display for TranslationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationKind::UserInput => write!(f, "user_input"),
            TranslationKind::AiGenerated => write!(f, "ai_generated"),
        }
    }
}

impl std::str::FromStr for TranslationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user_input" => Ok(TranslationKind::UserInput),
            "ai_generated" => Ok(TranslationKind::AiGenerated),
            _ => Err(anyhow::anyhow!("Invalid translation type: {}", s)),
        }
    }
}

/// A stored translation, as kept in history and saved collections
///
/// Legacy records used `source`/`target1`/`target2`; those names are still
/// accepted when reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Translation {
    pub id: String,
    #[serde(alias = "source")]
    pub source_text: String,
    #[serde(alias = "target1")]
    pub translation1: String,
    #[serde(alias = "target2")]
    pub translation2: String,
    pub timestamp: String,
    pub source_language: String,
    pub target_language1: String,
    pub target_language2: String,
    pub ai_model: String,
    pub context: String,
    #[serde(rename = "type")]
    pub kind: TranslationKind,
}

/// Raw outcome of a translation call, before it is shaped into a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub source: String,
    pub target1: String,
    pub target2: String,
    pub timestamp: String,
    pub source_language: String,
    pub target_language1: String,
    pub target_language2: String,
    pub ai_model: String,
    pub context: String,
    pub context_prompt: String,
}

impl TranslationResult {
    /// Shape this result into a history record
    pub fn into_record(self, id: String) -> Translation {
        Translation {
            id,
            source_text: self.source,
            translation1: self.target1,
            translation2: self.target2,
            timestamp: self.timestamp,
            source_language: self.source_language,
            target_language1: self.target_language1,
            target_language2: self.target_language2,
            ai_model: self.ai_model,
            context: self.context,
            kind: TranslationKind::UserInput,
        }
    }
}

/// Result of `perform_translation`: the raw result and the stored record
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub result: TranslationResult,
    pub translation_data: Translation,
}

/// Up to two target languages resolved for a translation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetLanguages {
    pub target_language1: Option<String>,
    pub target_language2: Option<String>,
}

/// Outcome of a field-by-field validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Outcome of probing the configured API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl ApiValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// One step of a routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineStep {
    pub id: String,
    pub title: String,
    pub order: u32,
}

/// A user-authored checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tags: Vec<String>,
    pub steps: Vec<RoutineStep>,
    pub created_at: String,
    pub updated_at: String,
}

/// Step as submitted by the user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineStepData {
    pub id: Option<String>,
    pub title: String,
    pub order: Option<u32>,
}

impl RoutineStepData {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Routine as submitted by the user, before validation and cleanup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutineData {
    pub name: String,
    pub description: Option<String>,
    pub tags_string: Option<String>,
    pub tags: Vec<String>,
    pub steps: Vec<RoutineStepData>,
}
