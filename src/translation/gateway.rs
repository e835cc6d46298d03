/*!
 * Gateway to the external chat-completion API.
 *
 * Each operation is a single remote call. Provider failures are mapped to
 * domain errors here:
 * - a non-success status becomes `TranslationError::Api`
 * - a missing response becomes `TranslationError::Network`
 * - anything else is passed through unchanged
 *
 * Language detection never fails; it reports a fallback instead.
 */

use log::{debug, error, warn};
use std::fmt;

use crate::errors::{ProviderError, TranslationError};
use crate::models::{ApiValidation, Settings};
use crate::providers::Provider;
use crate::providers::openai::{CompletionCall, OpenAIRequest, OpenAIResponse};
use crate::translation::prompts::{
    build_dual_language_example_prompt, build_language_detection_prompt,
    build_single_language_example_prompt, build_translation_prompt,
};

/// Sampling parameters and client title of one kind of call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallProfile {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Appended to the application name in the `X-Title` header
    pub title: &'static str,
}

pub const TRANSLATE_PROFILE: CallProfile = CallProfile {
    temperature: 0.3,
    max_tokens: 1000,
    title: "Translator",
};

pub const DETECT_PROFILE: CallProfile = CallProfile {
    temperature: 0.1,
    max_tokens: 10,
    title: "Language Detection",
};

pub const EXAMPLES_PROFILE: CallProfile = CallProfile {
    temperature: 0.7,
    max_tokens: 1500,
    title: "Example Generator",
};

pub const PROBE_PROFILE: CallProfile = CallProfile {
    temperature: 0.1,
    max_tokens: 10,
    title: "API Test",
};

/// Prompt sent by the configuration probe
pub const PROBE_PROMPT: &str = "Hello";

/// Why language detection fell back to the first candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// There was no text to analyze
    EmptyText,
    /// The model answered with something outside the candidates
    Unrecognized(String),
    /// The call itself failed
    RequestFailed(String),
}

impl fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackCause::EmptyText => write!(f, "no text to analyze"),
            FallbackCause::Unrecognized(reply) => {
                write!(f, "detected language \"{}\" is not a candidate", reply)
            }
            FallbackCause::RequestFailed(message) => write!(f, "request failed: {}", message),
        }
    }
}

/// Result of language detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// The model named one of the candidates
    Detected(String),
    /// The first candidate (or an empty code) was used instead
    FellBack {
        language: String,
        cause: FallbackCause,
    },
}

impl DetectionOutcome {
    /// The language code to use, whichever way it was obtained
    pub fn language(&self) -> &str {
        match self {
            DetectionOutcome::Detected(language) => language,
            DetectionOutcome::FellBack { language, .. } => language,
        }
    }

    pub fn into_language(self) -> String {
        match self {
            DetectionOutcome::Detected(language) => language,
            DetectionOutcome::FellBack { language, .. } => language,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DetectionOutcome::FellBack { .. })
    }
}

/// Map a provider failure to a domain error
///
/// `network_target` names the API in the network error message.
pub fn classify_provider_error(error: ProviderError, network_target: &str) -> TranslationError {
    match error {
        ProviderError::ApiError {
            status_code,
            message,
        } => TranslationError::Api {
            status: status_code,
            message,
        },
        ProviderError::ConnectionError(_) => TranslationError::Network(network_target.to_string()),
        other => TranslationError::Provider(other),
    }
}

/// Issues translation, detection, example and probe calls
#[derive(Debug, Clone)]
pub struct TranslationGateway<P> {
    provider: P,
    app_name: String,
}

impl<P> TranslationGateway<P>
where
    P: Provider<Request = CompletionCall, Response = OpenAIResponse>,
{
    pub fn new(provider: P, app_name: impl Into<String>) -> Self {
        Self {
            provider,
            app_name: app_name.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Build the call for `prompt` with the given profile
    fn build_call(&self, prompt: &str, profile: CallProfile, settings: &Settings) -> CompletionCall {
        CompletionCall {
            endpoint: settings.api_link.clone(),
            api_key: settings.api_key.clone(),
            title: format!("{} {}", self.app_name, profile.title),
            body: OpenAIRequest::new(settings.ai_model.clone())
                .add_message("user", prompt)
                .temperature(profile.temperature)
                .max_tokens(profile.max_tokens),
        }
    }

    /// Send a call and return the first choice's content
    async fn request_text(
        &self,
        prompt: &str,
        profile: CallProfile,
        settings: &Settings,
    ) -> Result<String, ProviderError> {
        let call = self.build_call(prompt, profile, settings);
        debug!(
            "Sending {} request ({} prompt chars)",
            profile.title,
            prompt.chars().count()
        );

        let response = self.provider.complete(call).await?;
        P::extract_text(&response)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }

    /// Translate `text` into one target language
    pub async fn translate_single_language(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        context_prompt: &str,
        settings: &Settings,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "Text to translate cannot be empty".to_string(),
            ));
        }
        if settings.api_key.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "API key is required. Please configure it in settings.".to_string(),
            ));
        }
        if settings.api_link.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "API link is required. Please configure it in settings.".to_string(),
            ));
        }
        if settings.ai_model.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "AI model is required. Please configure it in settings.".to_string(),
            ));
        }

        let prompt = build_translation_prompt(source_language, target_language, text, context_prompt);

        let translation = self
            .request_text(&prompt, TRANSLATE_PROFILE, settings)
            .await
            .map_err(|e| {
                error!("Single language translation error: {}", e);
                classify_provider_error(e, "translation API")
            })?
            .trim()
            .to_string();

        if translation.is_empty() {
            return Err(TranslationError::EmptyResponse("translation".to_string()));
        }

        Ok(translation)
    }

    /// Ask the model which of `available_languages` the text is written in
    ///
    /// Never fails: blank text, an unknown answer or a failed call all fall
    /// back to the first candidate, or an empty code when there is none.
    pub async fn detect_language(
        &self,
        text: &str,
        available_languages: &[String],
        language_options: &str,
        language_codes: &str,
        settings: &Settings,
    ) -> DetectionOutcome {
        let fallback = |cause: FallbackCause| {
            let language = available_languages.first().cloned().unwrap_or_default();
            warn!(
                "Language detection fell back to \"{}\": {}",
                language, cause
            );
            DetectionOutcome::FellBack { language, cause }
        };

        if text.trim().is_empty() {
            return fallback(FallbackCause::EmptyText);
        }

        let prompt = build_language_detection_prompt(language_options, language_codes, text);

        match self.request_text(&prompt, DETECT_PROFILE, settings).await {
            Ok(reply) => {
                let detected = reply.trim().to_lowercase();
                if available_languages.iter().any(|l| *l == detected) {
                    debug!("Detected source language: {}", detected);
                    DetectionOutcome::Detected(detected)
                } else {
                    fallback(FallbackCause::Unrecognized(detected))
                }
            }
            Err(e) => fallback(FallbackCause::RequestFailed(e.to_string())),
        }
    }

    /// Generate example sentences around `original_text`
    ///
    /// Uses the dual-language prompt when a second target is present and
    /// non-empty, else the single-language prompt. Returns the raw reply.
    pub async fn generate_examples(
        &self,
        original_text: &str,
        source_language: &str,
        target_language1: &str,
        target_language2: Option<&str>,
        context: &str,
        settings: &Settings,
    ) -> Result<String, TranslationError> {
        if original_text.is_empty() {
            return Err(TranslationError::InvalidInput(
                "Original text is required".to_string(),
            ));
        }
        if settings.api_key.trim().is_empty()
            || settings.api_link.trim().is_empty()
            || settings.ai_model.trim().is_empty()
        {
            return Err(TranslationError::InvalidInput(
                "API configuration is incomplete".to_string(),
            ));
        }

        let prompt = match target_language2.filter(|t| !t.is_empty()) {
            Some(target_language2) => build_dual_language_example_prompt(
                original_text,
                source_language,
                target_language1,
                target_language2,
                context,
            ),
            None if !target_language1.is_empty() => build_single_language_example_prompt(
                original_text,
                source_language,
                target_language1,
                context,
            ),
            None => return Err(TranslationError::NoTargetLanguages),
        };

        let examples = self
            .request_text(&prompt, EXAMPLES_PROFILE, settings)
            .await
            .map_err(|e| {
                error!("Example generation error: {}", e);
                classify_provider_error(e, "example generation API")
            })?
            .trim()
            .to_string();

        if examples.is_empty() {
            return Err(TranslationError::EmptyResponse("example generation".to_string()));
        }

        Ok(examples)
    }

    /// Probe the configured endpoint with a minimal request
    pub async fn validate_api_configuration(&self, settings: &Settings) -> ApiValidation {
        let call = self.build_call(PROBE_PROMPT, PROBE_PROFILE, settings);

        match self.provider.complete(call).await {
            Ok(response) if P::extract_text(&response).is_some() => ApiValidation::valid(),
            Ok(_) => ApiValidation::invalid("Invalid API response format"),
            Err(e) => {
                error!("API validation error: {}", e);
                ApiValidation::invalid(classify_provider_error(e, "API").to_string())
            }
        }
    }
}
