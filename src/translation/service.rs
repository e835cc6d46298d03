/*!
 * Translation workflows.
 *
 * `TranslationService` ties the gateway to the settings, context and history
 * stores. Every workflow is a linear sequence of awaited steps; a failed
 * step aborts the workflow and nothing partial is stored.
 */

use log::{error, info, warn};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::data::{ContextStore, HistoryStore, SettingsStore, find_context};
use crate::errors::TranslationError;
use crate::language_utils::language_display_name;
use crate::models::{
    ApiValidation, Context, DEFAULT_CONTEXT_NAME, Settings, TargetLanguages, Translation,
    TranslationOutcome, TranslationResult, ValidationResult, now_iso,
};
use crate::providers::Provider;
use crate::providers::openai::{CompletionCall, OpenAIResponse};
use crate::storage::{Storage, generate_id};
use crate::translation::gateway::{DetectionOutcome, TranslationGateway};
use crate::translation::parsing::parse_example_response;

/// Where the source language comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceSelection {
    /// Ask the model, falling back to the mother language
    #[default]
    Autodetect,
    /// Use this code as is
    Language(String),
}

impl From<&str> for SourceSelection {
    fn from(value: &str) -> Self {
        if value == "autodetect" {
            SourceSelection::Autodetect
        } else {
            SourceSelection::Language(value.to_string())
        }
    }
}

impl fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelection::Autodetect => write!(f, "autodetect"),
            SourceSelection::Language(code) => write!(f, "{}", code),
        }
    }
}

/// Which of the non-source languages receive a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetSelection {
    /// First and second candidate
    #[default]
    Both,
    /// First candidate only
    Target1,
    /// Second candidate only, reported as the first target
    Target2,
}

impl FromStr for TargetSelection {
    type Err = std::convert::Infallible;

    /// Unknown values select both targets
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "target1" => TargetSelection::Target1,
            "target2" => TargetSelection::Target2,
            _ => TargetSelection::Both,
        })
    }
}

impl fmt::Display for TargetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelection::Both => write!(f, "both"),
            TargetSelection::Target1 => write!(f, "target1"),
            TargetSelection::Target2 => write!(f, "target2"),
        }
    }
}

/// Check every required settings field, collecting all violations
pub fn validate_settings(settings: &Settings) -> ValidationResult {
    let mut errors = Vec::new();

    if settings.api_key.trim().is_empty() {
        errors.push("API key is required".to_string());
    }

    if settings.api_link.trim().is_empty() {
        errors.push("API link is required".to_string());
    } else if Url::parse(&settings.api_link).is_err() {
        errors.push("API link must be a valid URL".to_string());
    }

    if settings.ai_model.trim().is_empty() {
        errors.push("AI model is required".to_string());
    }

    let languages = [
        (&settings.mother_language, "Mother language is required"),
        (&settings.second_language, "Second language is required"),
        (&settings.learning_language, "Learning language is required"),
    ];
    for (value, message) in languages {
        if value.trim().is_empty() {
            errors.push(message.to_string());
        }
    }

    ValidationResult::from_errors(errors)
}

/// Pick the target languages for `source_language`
///
/// Candidates are the configured languages other than the source, in
/// configured order. Missing and empty candidates are `None`.
pub fn determine_target_languages(
    source_language: &str,
    selection: TargetSelection,
    settings: &Settings,
) -> TargetLanguages {
    let candidates: Vec<&str> = settings
        .configured_languages()
        .into_iter()
        .filter(|lang| *lang != source_language)
        .collect();

    let candidate = |index: usize| {
        candidates
            .get(index)
            .filter(|lang| !lang.is_empty())
            .map(|lang| lang.to_string())
    };

    match selection {
        TargetSelection::Both => TargetLanguages {
            target_language1: candidate(0),
            target_language2: candidate(1),
        },
        TargetSelection::Target1 => TargetLanguages {
            target_language1: candidate(0),
            target_language2: None,
        },
        TargetSelection::Target2 => TargetLanguages {
            target_language1: candidate(1),
            target_language2: None,
        },
    }
}

fn ensure_valid(settings: &Settings) -> Result<(), TranslationError> {
    let validation = validate_settings(settings);
    if validation.is_valid {
        Ok(())
    } else {
        Err(TranslationError::InvalidSettings(validation.errors))
    }
}

/// Orchestrates translation and example generation
#[derive(Clone)]
pub struct TranslationService<P> {
    gateway: TranslationGateway<P>,
    settings: SettingsStore,
    contexts: ContextStore,
    history: HistoryStore,
}

impl<P> TranslationService<P>
where
    P: Provider<Request = CompletionCall, Response = OpenAIResponse>,
{
    pub fn new(gateway: TranslationGateway<P>, storage: Storage) -> Self {
        Self {
            gateway,
            settings: SettingsStore::new(storage.clone()),
            contexts: ContextStore::new(storage.clone()),
            history: HistoryStore::new(storage),
        }
    }

    pub fn gateway(&self) -> &TranslationGateway<P> {
        &self.gateway
    }

    /// The selected context, else the built-in one
    pub fn resolve_context(&self) -> Result<Context, TranslationError> {
        let all = self.contexts.all_contexts();
        let selected = self.contexts.selected_context();

        find_context(&selected, &all)
            .or_else(|| find_context(DEFAULT_CONTEXT_NAME, &all))
            .cloned()
            .ok_or(TranslationError::NoContext)
    }

    /// Detect which configured language `text` is written in
    pub async fn detect_source_language(&self, text: &str, settings: &Settings) -> DetectionOutcome {
        let available: Vec<String> = settings
            .configured_languages()
            .iter()
            .map(|code| code.to_string())
            .collect();

        let language_options = available
            .iter()
            .map(|code| language_display_name(code))
            .collect::<Vec<_>>()
            .join(", ");
        let language_codes = available.join(", ");

        self.gateway
            .detect_language(text, &available, &language_options, &language_codes, settings)
            .await
    }

    /// Translate `text` into up to two languages, one after the other
    pub async fn translate_with_ai(
        &self,
        text: &str,
        source_language: &str,
        target_language1: Option<&str>,
        target_language2: Option<&str>,
        settings: &Settings,
    ) -> Result<TranslationResult, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "Text to translate cannot be empty".to_string(),
            ));
        }

        ensure_valid(settings)?;
        let context = self.resolve_context()?;

        let mut translations = [String::new(), String::new()];
        for (slot, target) in translations.iter_mut().zip([target_language1, target_language2]) {
            if let Some(target) = target {
                *slot = self
                    .gateway
                    .translate_single_language(text, source_language, target, &context.prompt, settings)
                    .await?;
            }
        }
        let [target1, target2] = translations;

        Ok(TranslationResult {
            source: text.to_string(),
            target1,
            target2,
            timestamp: now_iso(),
            source_language: source_language.to_string(),
            target_language1: target_language1.unwrap_or_default().to_string(),
            target_language2: target_language2.unwrap_or_default().to_string(),
            ai_model: settings.ai_model.clone(),
            context: context.name,
            context_prompt: context.prompt,
        })
    }

    /// Translate `text` and append the result to history
    pub async fn perform_translation(
        &self,
        text: &str,
        source: SourceSelection,
        targets: TargetSelection,
    ) -> Result<TranslationOutcome, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "Text to translate cannot be empty".to_string(),
            ));
        }

        let settings = self.settings.get_settings();

        let source_language = match source {
            SourceSelection::Autodetect => self
                .detect_source_language(text, &settings)
                .await
                .into_language(),
            SourceSelection::Language(code) => code,
        };

        let TargetLanguages {
            target_language1,
            target_language2,
        } = determine_target_languages(&source_language, targets, &settings);

        let result = self
            .translate_with_ai(
                text,
                &source_language,
                target_language1.as_deref(),
                target_language2.as_deref(),
                &settings,
            )
            .await?;

        let translation_data = result
            .clone()
            .into_record(format!("translation-{}", generate_id()));

        if !self.history.add_translation(translation_data.clone()) {
            warn!(
                "Translation {} could not be added to history",
                translation_data.id
            );
        }

        info!(
            "Translated from {} to [{}, {}]",
            result.source_language, result.target_language1, result.target_language2
        );

        Ok(TranslationOutcome {
            result,
            translation_data,
        })
    }

    /// Generate examples around a stored translation and append them to
    /// history
    ///
    /// A reply without any parseable line yields an empty list.
    pub async fn generate_example_translations(
        &self,
        original: &Translation,
    ) -> Result<Vec<Translation>, TranslationError> {
        let settings = self.settings.get_settings();
        ensure_valid(&settings)?;

        let target_language2 =
            Some(original.target_language2.as_str()).filter(|lang| !lang.is_empty());

        let examples_text = self
            .gateway
            .generate_examples(
                &original.source_text,
                &original.source_language,
                &original.target_language1,
                target_language2,
                &original.context,
                &settings,
            )
            .await?;

        let examples = parse_example_response(&examples_text, original);
        for example in &examples {
            if !self.history.add_translation(example.clone()) {
                warn!("Example {} could not be added to history", example.id);
            }
        }

        info!("Generated {} examples for {}", examples.len(), original.id);
        Ok(examples)
    }

    pub async fn generate_examples_for_translation(
        &self,
        translation: &Translation,
    ) -> Result<Vec<Translation>, TranslationError> {
        self.generate_example_translations(translation)
            .await
            .inspect_err(|e| error!("Example generation error: {}", e))
    }

    pub async fn validate_api_configuration(&self, settings: &Settings) -> ApiValidation {
        self.gateway.validate_api_configuration(settings).await
    }
}
