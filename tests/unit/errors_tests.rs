/*!
 * Tests for error types and their messages
 */

use fjalor::errors::{AppError, DataError, ImportIssue, ProviderError, StoreError, TranslationError};

/// Test the user-facing translation error messages
#[test]
fn test_translation_error_display_shouldMatchUserMessages() {
    let api = TranslationError::Api {
        status: 401,
        message: "Invalid API key".to_string(),
    };
    assert_eq!(api.to_string(), "API Error (401): Invalid API key");

    let network = TranslationError::Network("translation API".to_string());
    assert_eq!(network.to_string(), "Network error: Could not reach the translation API");

    let empty = TranslationError::EmptyResponse("translation".to_string());
    assert_eq!(empty.to_string(), "Empty translation response");

    let settings = TranslationError::InvalidSettings(vec![
        "API key is required".to_string(),
        "AI model is required".to_string(),
    ]);
    assert_eq!(
        settings.to_string(),
        "Settings validation failed: API key is required, AI model is required"
    );
}

/// Test that provider errors pass through transparently
#[test]
fn test_translation_error_fromProviderError_shouldKeepMessage() {
    let provider = ProviderError::ParseError("bad json".to_string());
    let expected = provider.to_string();

    let wrapped: TranslationError = provider.into();
    assert_eq!(wrapped.to_string(), expected);
}

/// Test data error messages
#[test]
fn test_data_error_display_shouldJoinDetails() {
    let validation = DataError::Validation(vec![
        "Context name is required".to_string(),
        "Context prompt is required".to_string(),
    ]);
    assert_eq!(
        validation.to_string(),
        "Context name is required, Context prompt is required"
    );

    assert_eq!(DataError::NotFound("Routine".to_string()).to_string(), "Routine not found");

    let import = DataError::InvalidImport(vec![
        ImportIssue::new("settings.apiKey", "missing property"),
        ImportIssue::new("contexts[1].name", "expected a string"),
    ]);
    assert_eq!(
        import.to_string(),
        "Invalid import data: settings.apiKey: missing property; contexts[1].name: expected a string"
    );
}

/// Test wrapping into the application error
#[test]
fn test_app_error_conversions_shouldPrefixCategory() {
    let from_data: AppError = DataError::NotFound("Translation abc".to_string()).into();
    assert_eq!(from_data.to_string(), "Data error: Translation abc not found");

    let from_translation: AppError = TranslationError::NoContext.into();
    assert!(matches!(from_translation, AppError::Translation(_)));

    let from_io: AppError = std::io::Error::other("disk full").into();
    assert_eq!(from_io.to_string(), "File error: disk full");
}

/// Test store error conversions
#[test]
fn test_store_error_fromSerdeError_shouldBeSerialization() {
    let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: StoreError = serde_error.into();

    assert!(matches!(error, StoreError::Serialization(_)));
    assert_eq!(StoreError::ReadOnly.to_string(), "Store is read-only");
}
