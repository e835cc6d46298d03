/*!
 * Translation contexts.
 *
 * The built-in `Expert` context always comes first and cannot be deleted.
 * User contexts are added and deleted, never edited in place. Names are
 * unique case-insensitively across built-in and user contexts.
 */

use log::{error, info};

use crate::errors::DataError;
use crate::models::{Context, DEFAULT_CONTEXT_NAME, Settings, ValidationResult};
use crate::storage::{Storage, keys};

/// Longest accepted context name, in characters
pub const MAX_CONTEXT_NAME_LEN: usize = 50;

/// Longest accepted context prompt, in characters
pub const MAX_CONTEXT_PROMPT_LEN: usize = 500;

/// The built-in contexts, as a fresh copy
pub fn default_contexts() -> Vec<Context> {
    vec![Context::builtin()]
}

/// Find a context by exact name
pub fn find_context<'a>(name: &str, contexts: &'a [Context]) -> Option<&'a Context> {
    contexts.iter().find(|c| c.name == name)
}

pub fn is_default_context(name: &str) -> bool {
    default_contexts().iter().any(|c| c.name == name)
}

pub fn is_deletable_context(name: &str) -> bool {
    name != DEFAULT_CONTEXT_NAME
}

/// Check a context against the length rules and the existing names
pub fn validate_context(context: &Context, existing: &[Context]) -> ValidationResult {
    let mut errors = Vec::new();

    if context.name.trim().is_empty() {
        errors.push("Context name is required".to_string());
    }
    if context.prompt.trim().is_empty() {
        errors.push("Context prompt is required".to_string());
    }
    if context.name.chars().count() > MAX_CONTEXT_NAME_LEN {
        errors.push(format!(
            "Context name must be {} characters or less",
            MAX_CONTEXT_NAME_LEN
        ));
    }
    if context.prompt.chars().count() > MAX_CONTEXT_PROMPT_LEN {
        errors.push(format!(
            "Context prompt must be {} characters or less",
            MAX_CONTEXT_PROMPT_LEN
        ));
    }

    let lowered = context.name.to_lowercase();
    if !context.name.is_empty() && existing.iter().any(|c| c.name.to_lowercase() == lowered) {
        errors.push("A context with this name already exists".to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Repository for user contexts and the selected-context setting
#[derive(Clone)]
pub struct ContextStore {
    storage: Storage,
}

impl ContextStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn user_contexts(&self) -> Vec<Context> {
        self.storage.load(keys::USER_CONTEXTS, Vec::new())
    }

    /// Built-in contexts followed by user contexts
    pub fn all_contexts(&self) -> Vec<Context> {
        let mut contexts = default_contexts();
        contexts.extend(self.user_contexts());
        contexts
    }

    pub fn context_by_name(&self, name: &str) -> Option<Context> {
        find_context(name, &self.all_contexts()).cloned()
    }

    /// Validate and append a user context; name and prompt are trimmed
    pub fn add_context(&self, name: &str, prompt: &str) -> Result<Context, DataError> {
        let mut user_contexts = self.user_contexts();
        let mut existing = default_contexts();
        existing.extend(user_contexts.iter().cloned());

        let context = Context::new(name.trim(), prompt.trim());
        let validation = validate_context(&context, &existing);
        if !validation.is_valid {
            return Err(DataError::Validation(validation.errors));
        }

        user_contexts.push(context.clone());
        if !self.storage.save(keys::USER_CONTEXTS, &user_contexts) {
            error!("Error adding context {}", context.name);
            return Err(DataError::Persistence("Failed to save context".to_string()));
        }

        info!("Added context: {}", context.name);
        Ok(context)
    }

    /// Delete a user context
    ///
    /// When the deleted context was selected, the selection falls back to
    /// the built-in context.
    pub fn delete_context(&self, name: &str) -> Result<(), DataError> {
        if !is_deletable_context(name) {
            return Err(DataError::Protected(
                "Cannot delete default context".to_string(),
            ));
        }

        let user_contexts = self.user_contexts();
        let remaining: Vec<Context> = user_contexts
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();

        if remaining.len() == user_contexts.len() {
            return Err(DataError::NotFound("Context".to_string()));
        }

        let saved = self.storage.save(keys::USER_CONTEXTS, &remaining);

        if self.selected_context() == name {
            self.set_selected_context(DEFAULT_CONTEXT_NAME);
        }

        if saved {
            info!("Deleted context: {}", name);
            Ok(())
        } else {
            Err(DataError::Persistence("Failed to delete context".to_string()))
        }
    }

    /// Name of the selected context, `Expert` when unset
    pub fn selected_context(&self) -> String {
        self.storage
            .load_opt::<Settings>(keys::SETTINGS)
            .map(|s| s.selected_context)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTEXT_NAME.to_string())
    }

    pub fn set_selected_context(&self, name: &str) -> bool {
        let mut settings: Settings = self.storage.load(keys::SETTINGS, Settings::default());
        settings.selected_context = name.to_string();
        self.storage.save(keys::SETTINGS, &settings)
    }
}
