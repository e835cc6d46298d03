/*!
 * Prompt templates for translation, language detection and example
 * generation.
 *
 * The example templates ask the model for lines shaped
 * `Example <n>: <source> | <translation>[ | <translation>]`; the parser in
 * `translation::parsing` depends on that shape, so changing the requested
 * format is a breaking change for it.
 */

/// A prompt template with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Single-language translation. Vars: sourceLanguage, targetLanguage, text
    pub const TRANSLATE: &'static str = r#"Translate the following text from {sourceLanguage} to {targetLanguage}.
Provide only the translation, no additional text or explanations.

Text to translate: "{text}""#;

    /// Language detection. Vars: languageOptions, languageCodes, text
    pub const DETECT_LANGUAGE: &'static str = r#"Detect which language this text is written from these options: {languageOptions}.
Respond with only the language code: {languageCodes}.

Text to translate: "{text}""#;

    /// Examples with one target. Vars: originalText, sourceLanguage, targetLanguage, context
    pub const SINGLE_EXAMPLE: &'static str = r#"Based on the original text and the context provided, create 3 example sentences that are similar in context, theme, or structure.

Original text: "{originalText}"
Source language: "{sourceLanguage}"
Target language: "{targetLanguage}"
Context: "{context}"

Generate 3 realistic examples in the source language, then translate each to the target language. Make them practical.

Return the response in this format:
Example 1: [source sentence] | [translation]
Example 2: [source sentence] | [translation]
Example 3: [source sentence] | [translation]"#;

    /// Examples with two targets. Vars: originalText, sourceLanguage,
    /// targetLanguage1, targetLanguage2, context
    pub const DUAL_EXAMPLE: &'static str = r#"Based on the original text and the context provided, create 3 example sentences that are similar first in user inputed text(originalText) then in context, theme, or structure.

Original text: "{originalText}"
Source language: "{sourceLanguage}"
Target languages: "{targetLanguage1}, {targetLanguage2}"
Context: "{context}"

Generate 3 realistic examples in the source language, then translate each to both target languages. Make them practical.

Return the response in this format:
Example 1: [source sentence] | [translation1] | [translation2]
Example 2: [source sentence] | [translation1] | [translation2]
Example 3: [source sentence] | [translation1] | [translation2]"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    pub fn translate() -> Self {
        Self::new(Self::TRANSLATE)
    }

    pub fn detect_language() -> Self {
        Self::new(Self::DETECT_LANGUAGE)
    }

    pub fn single_example() -> Self {
        Self::new(Self::SINGLE_EXAMPLE)
    }

    pub fn dual_example() -> Self {
        Self::new(Self::DUAL_EXAMPLE)
    }

    /// Render the template with the given variables.
    pub fn render(&self, variables: &[(&str, &str)]) -> String {
        render(&self.template, variables)
    }
}

/// Replace every `{name}` occurrence for each variable, in order.
///
/// Placeholders without a matching variable are left as they are.
pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    variables
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
}

/// Translation prompt, prefixed with the context instruction when present
pub fn build_translation_prompt(
    source_language: &str,
    target_language: &str,
    text: &str,
    context_prompt: &str,
) -> String {
    let base = PromptTemplate::translate().render(&[
        ("sourceLanguage", source_language),
        ("targetLanguage", target_language),
        ("text", text),
    ]);

    if context_prompt.is_empty() {
        base
    } else {
        format!("{}\n\n{}", context_prompt, base)
    }
}

pub fn build_language_detection_prompt(
    language_options: &str,
    language_codes: &str,
    text: &str,
) -> String {
    PromptTemplate::detect_language().render(&[
        ("languageOptions", language_options),
        ("languageCodes", language_codes),
        ("text", text),
    ])
}

pub fn build_single_language_example_prompt(
    original_text: &str,
    source_language: &str,
    target_language: &str,
    context: &str,
) -> String {
    PromptTemplate::single_example().render(&[
        ("originalText", original_text),
        ("sourceLanguage", source_language),
        ("targetLanguage", target_language),
        ("context", context),
    ])
}

pub fn build_dual_language_example_prompt(
    original_text: &str,
    source_language: &str,
    target_language1: &str,
    target_language2: &str,
    context: &str,
) -> String {
    PromptTemplate::dual_example().render(&[
        ("originalText", original_text),
        ("sourceLanguage", source_language),
        ("targetLanguage1", target_language1),
        ("targetLanguage2", target_language2),
        ("context", context),
    ])
}
