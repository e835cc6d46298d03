/*!
 * Error types for the fjalor application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a chat-completion endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request could not be built or failed locally
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// No response was received (connect failure, timeout)
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors raised by the translation gateway and orchestrator
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Input rejected before any network call
    #[error("{0}")]
    InvalidInput(String),

    /// One or more settings fields are missing or malformed
    #[error("Settings validation failed: {}", .0.join(", "))]
    InvalidSettings(Vec<String>),

    /// The remote API answered with a non-success status
    #[error("API Error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic fallback
        message: String,
    },

    /// The remote API could not be reached
    #[error("Network error: Could not reach the {0}")]
    Network(String),

    /// The API answered but the content was blank
    #[error("Empty {0} response")]
    EmptyResponse(String),

    /// Neither target language is usable for example generation
    #[error("No target languages available for example generation")]
    NoTargetLanguages,

    /// Neither the selected nor the built-in context could be found
    #[error("No translation context available")]
    NoContext,

    /// Any other provider failure, passed through unchanged
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Backend failures of a key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected the operation
    #[error("Database error: {0}")]
    Database(String),

    /// A value could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store lock was poisoned or unavailable
    #[error("Lock error: {0}")]
    Lock(String),

    /// Writes are disabled on this store
    #[error("Store is read-only")]
    ReadOnly,
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// A single problem found while validating an import payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// Location in the payload, e.g. `settings.apiKey` or `contexts[2].name`
    pub path: String,
    /// What is wrong at that location
    pub problem: String,
}

impl ImportIssue {
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

fn join_issues(issues: &[ImportIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors reported by the history, context, settings and routine adapters
#[derive(Error, Debug)]
pub enum DataError {
    /// One or more fields failed validation
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// The referenced record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The record is built in and cannot be modified
    #[error("{0}")]
    Protected(String),

    /// There is nothing to export
    #[error("{0}")]
    NothingToExport(String),

    /// The import payload is not valid JSON
    #[error("Invalid import file: {0}")]
    MalformedImport(String),

    /// The import payload failed schema validation
    #[error("Invalid import data: {}", join_issues(.0))]
    InvalidImport(Vec<ImportIssue>),

    /// The store refused the write
    #[error("{0}")]
    Persistence(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from a data adapter
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
