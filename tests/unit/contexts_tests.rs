/*!
 * Tests for translation contexts
 */

use fjalor::data::{
    ContextStore, default_contexts, find_context, is_default_context, is_deletable_context,
    validate_context,
};
use fjalor::errors::DataError;
use fjalor::models::{Context, DEFAULT_CONTEXT_NAME};
use fjalor::storage::Storage;

fn store() -> ContextStore {
    ContextStore::new(Storage::in_memory())
}

/// Test the built-in context
#[test]
fn test_default_contexts_shouldOnlyContainExpert() {
    let defaults = default_contexts();

    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].name, DEFAULT_CONTEXT_NAME);
    assert!(is_default_context("Expert"));
    assert!(!is_default_context("expert"));
    assert!(!is_deletable_context("Expert"));
    assert!(is_deletable_context("Casual"));
    assert!(find_context("Expert", &defaults).is_some());
}

/// Test that names are unique regardless of case
#[test]
fn test_add_context_withExpertInLowercase_shouldFail() {
    let contexts = store();

    let error = contexts.add_context("expert", "Anything").unwrap_err();

    assert!(matches!(error, DataError::Validation(_)));
    assert_eq!(error.to_string(), "A context with this name already exists");
    assert!(contexts.user_contexts().is_empty());
}

/// Test length limits are counted in characters
#[test]
fn test_validate_context_lengthLimits_shouldCountCharacters() {
    let at_limit = Context::new("ë".repeat(50), "ç".repeat(500));
    assert!(validate_context(&at_limit, &default_contexts()).is_valid);

    let over_limit = Context::new("n".repeat(51), "p".repeat(501));
    let validation = validate_context(&over_limit, &default_contexts());
    assert_eq!(
        validation.errors,
        vec![
            "Context name must be 50 characters or less",
            "Context prompt must be 500 characters or less",
        ]
    );
}

/// Test adding trims and appends after the built-ins
#[test]
fn test_add_context_shouldTrimAndAppend() {
    let contexts = store();

    let added = contexts.add_context("  Casual ", " Keep it light. ").unwrap();
    contexts.add_context("Legal", "Use legal terminology.").unwrap();

    assert_eq!(added, Context::new("Casual", "Keep it light."));
    let names: Vec<String> = contexts.all_contexts().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Expert", "Casual", "Legal"]);
    assert!(contexts.context_by_name("Legal").is_some());
}

/// Test the built-in context cannot be deleted
#[test]
fn test_delete_context_expert_shouldBeRejected() {
    let contexts = store();

    let error = contexts.delete_context("Expert").unwrap_err();

    assert!(matches!(error, DataError::Protected(_)));
    assert_eq!(error.to_string(), "Cannot delete default context");
}

/// Test deleting the selected context resets the selection
#[test]
fn test_delete_context_whenSelected_shouldResetToExpert() {
    let contexts = store();
    contexts.add_context("Casual", "Keep it light.").unwrap();
    assert!(contexts.set_selected_context("Casual"));
    assert_eq!(contexts.selected_context(), "Casual");

    contexts.delete_context("Casual").unwrap();

    assert_eq!(contexts.selected_context(), "Expert");
    assert!(contexts.user_contexts().is_empty());
    assert!(matches!(
        contexts.delete_context("Casual"),
        Err(DataError::NotFound(_))
    ));
}
