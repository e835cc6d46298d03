/*!
 * # Fjalor - AI-assisted translation helper
 *
 * A Rust library for translating short texts into up to two languages
 * through an OpenAI-compatible chat-completion API.
 *
 * ## Features
 *
 * - Source language auto-detection with an explicit fallback result
 * - Translation into one or two of the user's configured languages
 * - Tone and style contexts prefixed to every translation prompt
 * - Example sentence generation parsed into structured records
 * - Local history, saved items, contexts and routines
 * - CSV and JSON export, validated all-or-nothing JSON import
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::prompts`: Prompt templates
 *   - `translation::gateway`: Remote calls and error classification
 *   - `translation::parsing`: Example response parser
 *   - `translation::service`: Translation workflows
 * - `data`: History, context, settings, transfer and routine stores
 * - `storage`: Key-value persistence (SQLite and in-memory)
 * - `app_controller`: Main application controller
 * - `language_utils`: Language names and codes
 * - `providers`: Chat-completion clients:
 *   - `providers::openai`: OpenAI-compatible API client
 *   - `providers::mock`: Scripted provider for tests
 * - `models`: Records shared across modules
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod data;
pub mod errors;
pub mod language_utils;
pub mod models;
pub mod providers;
pub mod storage;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, DataError, ProviderError, StoreError, TranslationError};
pub use language_utils::{get_language_name, language_display_name};
pub use models::{Context, Routine, Settings, Translation, TranslationKind};
pub use storage::Storage;
pub use translation::{SourceSelection, TargetSelection, TranslationService};
