//! Language utilities
//!
//! The application offers a fixed set of languages in its pickers; codes
//! outside that set are still accepted and named through ISO 639 lookups.

use anyhow::{Result, anyhow};
use isolang::Language;

/// Languages offered by the application, in display order
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("sq", "Albanian"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ar", "Arabic"),
    ("tr", "Turkish"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
];

/// A language choice for select-style inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub value: String,
    pub label: String,
}

/// Get the ISO 639 English name for a 2- or 3-letter code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Human-readable name for a code: the application's own label, then the
/// ISO 639 name, then the code itself
pub fn language_display_name(code: &str) -> String {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| (*name).to_string())
        .or_else(|| get_language_name(code).ok())
        .unwrap_or_else(|| code.to_string())
}

/// All supported languages as picker options
pub fn language_options() -> Vec<LanguageOption> {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| LanguageOption {
            value: (*code).to_string(),
            label: (*name).to_string(),
        })
        .collect()
}

/// All supported language codes
pub fn language_codes() -> Vec<&'static str> {
    SUPPORTED_LANGUAGES.iter().map(|(code, _)| *code).collect()
}

/// All supported language names
pub fn language_names() -> Vec<&'static str> {
    SUPPORTED_LANGUAGES.iter().map(|(_, name)| *name).collect()
}

/// Check if a language code is offered by the application
pub fn is_language_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}
