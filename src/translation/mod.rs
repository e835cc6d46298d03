/*!
 * Translation request pipeline.
 *
 * This module turns user text and stored settings into chat-completion
 * calls and structured records. It is split into several submodules:
 *
 * - `prompts`: Prompt templates and builders
 * - `gateway`: Remote calls and error classification
 * - `parsing`: Parser for generated example lines
 * - `service`: Translation and example-generation workflows
 */

// Re-export main types for easier usage
pub use self::gateway::{DetectionOutcome, FallbackCause, TranslationGateway};
pub use self::parsing::parse_example_response;
pub use self::service::{
    SourceSelection, TargetSelection, TranslationService, determine_target_languages,
    validate_settings,
};

// Re-export prompt types
pub use self::prompts::PromptTemplate;

// Submodules
pub mod gateway;
pub mod parsing;
pub mod prompts;
pub mod service;
