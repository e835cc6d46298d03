/*!
 * Line-oriented parser for generated example sentences.
 *
 * Accepted grammar, one example per line:
 *
 * ```text
 * line   := "Example" ws* digits ":" ws* field ws* "|" ws* field [ ws* "|" ws* field ]
 * ```
 *
 * The three-field form is tried first. Lines matching neither form are
 * dropped without error.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Translation, TranslationKind, now_iso};

static DUAL_EXAMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Example\s*[0-9]+:\s*(.+?)\s*\|\s*(.+?)\s*\|\s*(.+)$")
        .unwrap_or_else(|e| panic!("invalid dual example pattern: {e}"))
});

static SINGLE_EXAMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Example\s*[0-9]+:\s*(.+?)\s*\|\s*(.+)$")
        .unwrap_or_else(|e| panic!("invalid single example pattern: {e}"))
});

/// Fields captured from one example line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleLine {
    /// `Example n: source | translation`
    Single {
        source: String,
        translation: String,
    },
    /// `Example n: source | translation1 | translation2`
    Dual {
        source: String,
        translation1: String,
        translation2: String,
    },
}

/// Match a single line against the example grammar
pub fn parse_example_line(line: &str) -> Option<ExampleLine> {
    if let Some(caps) = DUAL_EXAMPLE.captures(line) {
        return Some(ExampleLine::Dual {
            source: caps[1].trim().to_string(),
            translation1: caps[2].trim().to_string(),
            translation2: caps[3].trim().to_string(),
        });
    }

    SINGLE_EXAMPLE.captures(line).map(|caps| ExampleLine::Single {
        source: caps[1].trim().to_string(),
        translation: caps[2].trim().to_string(),
    })
}

/// Turn a generated reply into example records derived from `original`
///
/// Each record gets its own id, the `ai_generated` type and the original's
/// languages, model and context. Single-field lines blank the second
/// target language.
pub fn parse_example_response(response_text: &str, original: &Translation) -> Vec<Translation> {
    let batch_stamp = chrono::Utc::now().timestamp_millis();
    let batch_tag = uuid::Uuid::new_v4().simple().to_string();

    response_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .filter_map(|(index, line)| {
            let parsed = parse_example_line(line)?;
            let (source_text, translation1, translation2, target_language2) = match parsed {
                ExampleLine::Dual {
                    source,
                    translation1,
                    translation2,
                } => (
                    source,
                    translation1,
                    translation2,
                    original.target_language2.clone(),
                ),
                ExampleLine::Single {
                    source,
                    translation,
                } => (source, translation, String::new(), String::new()),
            };

            Some(Translation {
                id: format!("example-{}-{}-{}", batch_stamp, &batch_tag[..8], index),
                source_text,
                translation1,
                translation2,
                timestamp: now_iso(),
                source_language: original.source_language.clone(),
                target_language1: original.target_language1.clone(),
                target_language2,
                ai_model: original.ai_model.clone(),
                context: original.context.clone(),
                kind: TranslationKind::AiGenerated,
            })
        })
        .collect()
}
