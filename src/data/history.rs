use log::{debug, error};
use std::cmp::Reverse;

use crate::errors::DataError;
use crate::models::{Translation, now_iso};
use crate::storage::{Storage, keys};

/// How to find a translation among the saved ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedLookup<'a> {
    /// Match by record id
    Id(&'a str),
    /// Match by source text and both translations
    Content {
        source_text: &'a str,
        translation1: &'a str,
        translation2: &'a str,
    },
}

/// History and saved translations, each sorted newest first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationOverview {
    pub all_translations: Vec<Translation>,
    pub saved_translations: Vec<Translation>,
    /// Number of history entries
    pub total_count: usize,
}

/// Repository for the history and saved collections
#[derive(Clone)]
pub struct HistoryStore {
    storage: Storage,
}

impl HistoryStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    // =========================================================================
    // Raw collections
    // =========================================================================

    pub fn history(&self) -> Vec<Translation> {
        self.storage.load(keys::HISTORY, Vec::new())
    }

    pub fn saved(&self) -> Vec<Translation> {
        self.storage.load(keys::SAVED, Vec::new())
    }

    pub fn save_history(&self, translations: &[Translation]) -> bool {
        self.storage.save(keys::HISTORY, translations)
    }

    pub fn save_saved(&self, translations: &[Translation]) -> bool {
        self.storage.save(keys::SAVED, translations)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Insert a translation at the front of history
    ///
    /// A blank id or timestamp is filled in before storing.
    pub fn add_translation(&self, mut translation: Translation) -> bool {
        if translation.id.is_empty() {
            translation.id = self.storage.generate_id();
        }
        if translation.timestamp.is_empty() {
            translation.timestamp = now_iso();
        }

        let mut history = self.history();
        debug!("Adding translation {} to history", translation.id);
        history.insert(0, translation);
        self.save_history(&history)
    }

    /// Remove a translation from history; its saved copy is kept
    pub fn delete_translation(&self, id: &str) -> bool {
        let mut history = self.history();
        history.retain(|t| t.id != id);
        self.save_history(&history)
    }

    // =========================================================================
    // Saved
    // =========================================================================

    /// Copy a history entry into the saved collection
    ///
    /// Returns `false` when `id` is not in history; saving an already saved
    /// id succeeds without changes.
    pub fn save_translation_by_id(&self, id: &str) -> bool {
        let Some(translation) = self.history().into_iter().find(|t| t.id == id) else {
            return false;
        };

        let mut saved = self.saved();
        if saved.iter().any(|t| t.id == id) {
            return true;
        }

        saved.insert(0, translation);
        self.save_saved(&saved)
    }

    /// Save a translation and hand it back on success
    pub fn save_translation(&self, translation: &Translation) -> Result<Translation, DataError> {
        if !self.history().iter().any(|t| t.id == translation.id) {
            return Err(DataError::NotFound("Translation".to_string()));
        }

        if self.save_translation_by_id(&translation.id) {
            Ok(translation.clone())
        } else {
            error!("Error saving translation {}", translation.id);
            Err(DataError::Persistence("Failed to save translation".to_string()))
        }
    }

    /// Remove a translation from the saved collection only
    pub fn unsave_translation_by_id(&self, id: &str) -> bool {
        let mut saved = self.saved();
        saved.retain(|t| t.id != id);
        self.save_saved(&saved)
    }

    pub fn clear_saved(&self) -> bool {
        self.save_saved(&[])
    }

    pub fn clear_all_saved(&self) -> Result<(), DataError> {
        if self.clear_saved() {
            Ok(())
        } else {
            Err(DataError::Persistence(
                "Failed to clear saved translations".to_string(),
            ))
        }
    }

    pub fn is_translation_saved(&self, lookup: SavedLookup<'_>) -> bool {
        let saved = self.saved();
        match lookup {
            SavedLookup::Id(id) => saved.iter().any(|t| t.id == id),
            SavedLookup::Content {
                source_text,
                translation1,
                translation2,
            } => saved.iter().any(|t| {
                t.source_text == source_text
                    && t.translation1 == translation1
                    && t.translation2 == translation2
            }),
        }
    }

    pub fn saved_count(&self) -> usize {
        self.saved().len()
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Both collections sorted newest first, plus the history size
    pub fn all_translation_data(&self) -> TranslationOverview {
        let mut all_translations = self.history();
        let mut saved_translations = self.saved();
        let total_count = all_translations.len();

        sort_newest_first(&mut all_translations);
        sort_newest_first(&mut saved_translations);

        TranslationOverview {
            all_translations,
            saved_translations,
            total_count,
        }
    }
}

/// Millisecond timestamp of a record; unreadable timestamps sort oldest
fn timestamp_millis(translation: &Translation) -> i64 {
    chrono::DateTime::parse_from_rfc3339(&translation.timestamp)
        .map(|ts| ts.timestamp_millis())
        .unwrap_or(i64::MIN)
}

/// Stable descending sort, so equal timestamps keep their relative order
fn sort_newest_first(translations: &mut [Translation]) {
    translations.sort_by_key(|t| Reverse(timestamp_millis(t)));
}
