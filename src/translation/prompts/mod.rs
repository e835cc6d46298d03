/*!
 * Prompt construction for translation requests.
 *
 * This module provides:
 * - The four fixed prompt templates
 * - Placeholder substitution
 * - Builders that fill each template from request data
 */

pub mod templates;

// Re-export main types
pub use templates::{
    PromptTemplate, build_dual_language_example_prompt, build_language_detection_prompt,
    build_single_language_example_prompt, build_translation_prompt, render,
};
