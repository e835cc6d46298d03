/*!
 * Export and import of user data.
 *
 * Exports:
 * - saved translations as CSV
 * - settings plus every context as JSON
 * - settings, history, contexts and metadata as JSON
 *
 * Imports validate the whole payload first and collect every problem as an
 * `ImportIssue`. Nothing is written unless the payload is fully valid.
 */

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::contexts::{ContextStore, is_default_context};
use crate::data::history::HistoryStore;
use crate::data::settings::SettingsStore;
use crate::errors::{DataError, ImportIssue};
use crate::models::{Context, Settings, Translation, now_iso};
use crate::storage::{Storage, keys};

/// Version written into full-data exports
pub const EXPORT_VERSION: &str = "1.0";

/// CSV header row of the saved-translations export
pub const CSV_HEADER: &str = "ID,Timestamp,Source Language,Target Language 1,Target Language 2,AI Model,Source Text,Translation 1,Translation 2,Context,Type";

/// Settings keys every import must carry
pub const REQUIRED_SETTINGS: [&str; 6] = [
    "motherlanguage",
    "secondlanguage",
    "learninglanguage",
    "apiLink",
    "apiKey",
    "aiModel",
];

/// Settings as they appear in export files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSettings {
    pub motherlanguage: String,
    pub secondlanguage: String,
    pub learninglanguage: String,
    #[serde(rename = "apiLink")]
    pub api_link: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "aiModel")]
    pub ai_model: String,
    #[serde(
        rename = "selectedContext",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_context: Option<String>,
}

impl From<&Settings> for ExportedSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            motherlanguage: settings.mother_language.clone(),
            secondlanguage: settings.second_language.clone(),
            learninglanguage: settings.learning_language.clone(),
            api_link: settings.api_link.clone(),
            api_key: settings.api_key.clone(),
            ai_model: settings.ai_model.clone(),
            selected_context: Some(settings.selected_context.clone()),
        }
    }
}

impl ExportedSettings {
    /// Full settings: these values over the defaults
    pub fn into_settings(self) -> Settings {
        let mut settings = Settings {
            mother_language: self.motherlanguage,
            second_language: self.secondlanguage,
            learning_language: self.learninglanguage,
            api_link: self.api_link,
            api_key: self.api_key,
            ai_model: self.ai_model,
            ..Settings::default()
        };
        if let Some(selected) = self.selected_context {
            settings.selected_context = selected;
        }
        settings
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsExport {
    pub settings: ExportedSettings,
    pub contexts: Vec<Context>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportCounts {
    pub translations: usize,
    pub contexts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: String,
    pub version: String,
    pub counts: ExportCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullExport {
    pub settings: ExportedSettings,
    pub translations: Vec<Translation>,
    pub contexts: Vec<Context>,
    pub metadata: ExportMetadata,
}

/// Double every embedded double quote
pub fn escape_csv_field(field: &str) -> String {
    field.replace('"', "\"\"")
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", escape_csv_field(field))
}

/// Validated content of an import payload, ready to be written
struct ImportPlan {
    settings: Settings,
    translations: Option<Vec<Translation>>,
    user_contexts: Vec<Context>,
}

/// Export and import over the settings, history and context collections
#[derive(Clone)]
pub struct DataTransfer {
    storage: Storage,
    settings: SettingsStore,
    history: HistoryStore,
    contexts: ContextStore,
}

impl DataTransfer {
    pub fn new(storage: Storage) -> Self {
        Self {
            settings: SettingsStore::new(storage.clone()),
            history: HistoryStore::new(storage.clone()),
            contexts: ContextStore::new(storage.clone()),
            storage,
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Saved translations as CSV, or an empty string when there are none
    pub fn saved_translations_csv(&self) -> String {
        let saved = self.history.saved();
        if saved.is_empty() {
            return String::new();
        }

        let mut rows = Vec::with_capacity(saved.len() + 1);
        rows.push(CSV_HEADER.to_string());
        rows.extend(saved.iter().map(|t| {
            [
                t.id.clone(),
                t.timestamp.clone(),
                t.source_language.clone(),
                t.target_language1.clone(),
                t.target_language2.clone(),
                t.ai_model.clone(),
                quoted(&t.source_text),
                quoted(&t.translation1),
                quoted(&t.translation2),
                quoted(&t.context),
                quoted(&t.kind.to_string()),
            ]
            .join(",")
        }));

        rows.join("\n")
    }

    pub fn export_translations(&self) -> Result<String, DataError> {
        let csv = self.saved_translations_csv();
        if csv.is_empty() {
            return Err(DataError::NothingToExport(
                "No saved translations to export".to_string(),
            ));
        }
        Ok(csv)
    }

    /// Settings and every context as pretty JSON
    pub fn export_settings(&self) -> Result<String, DataError> {
        let export = SettingsExport {
            settings: ExportedSettings::from(&self.settings.get_settings()),
            contexts: self.contexts.all_contexts(),
        };

        serde_json::to_string_pretty(&export).map_err(|e| {
            error!("Settings export error: {}", e);
            DataError::Persistence(format!("Failed to export settings: {}", e))
        })
    }

    /// Settings, history, contexts and metadata as pretty JSON
    pub fn export_all_data(&self) -> Result<String, DataError> {
        let translations = self.history.history();
        let contexts = self.contexts.all_contexts();

        let export = FullExport {
            settings: ExportedSettings::from(&self.settings.get_settings()),
            metadata: ExportMetadata {
                export_date: now_iso(),
                version: EXPORT_VERSION.to_string(),
                counts: ExportCounts {
                    translations: translations.len(),
                    contexts: contexts.len(),
                },
            },
            translations,
            contexts,
        };

        serde_json::to_string_pretty(&export).map_err(|e| {
            error!("All data export error: {}", e);
            DataError::Persistence(format!("Failed to export all data: {}", e))
        })
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Replace settings and user contexts; history is left untouched
    pub fn import_settings(&self, json: &str) -> Result<(), DataError> {
        let payload = parse_payload(json)?;
        let plan = validate_payload(&payload, false)?;
        self.apply(plan)?;
        info!("Imported settings and contexts");
        Ok(())
    }

    /// Replace settings, history and user contexts
    pub fn import_all_data(&self, json: &str) -> Result<(), DataError> {
        let payload = parse_payload(json)?;
        let plan = validate_payload(&payload, true)?;
        self.apply(plan)?;
        info!("Imported all data");
        Ok(())
    }

    fn apply(&self, plan: ImportPlan) -> Result<(), DataError> {
        let mut ok = self.storage.save(keys::SETTINGS, &plan.settings);
        if let Some(translations) = &plan.translations {
            ok &= self.history.save_history(translations);
        }
        ok &= self.storage.save(keys::USER_CONTEXTS, &plan.user_contexts);

        if ok {
            Ok(())
        } else {
            Err(DataError::Persistence(
                "Failed to save imported data".to_string(),
            ))
        }
    }
}

fn parse_payload(json: &str) -> Result<Value, DataError> {
    serde_json::from_str(json).map_err(|e| {
        error!("Import parse error: {}", e);
        DataError::MalformedImport(e.to_string())
    })
}

/// Check the whole payload and build what would be written
fn validate_payload(payload: &Value, with_translations: bool) -> Result<ImportPlan, DataError> {
    let mut issues = Vec::new();

    let Some(root) = payload.as_object() else {
        return Err(DataError::InvalidImport(vec![ImportIssue::new(
            "$",
            "expected an object",
        )]));
    };

    let mut sections = vec!["settings", "contexts"];
    if with_translations {
        sections.insert(1, "translations");
    }
    for section in &sections {
        if !root.contains_key(*section) {
            issues.push(ImportIssue::new(*section, "missing section"));
        }
    }

    let settings = root.get("settings").and_then(|v| check_settings(v, &mut issues));
    let user_contexts = root
        .get("contexts")
        .and_then(|v| check_contexts(v, &mut issues));
    let translations = if with_translations {
        root.get("translations")
            .and_then(|v| check_translations(v, &mut issues))
    } else {
        None
    };

    if !issues.is_empty() {
        return Err(DataError::InvalidImport(issues));
    }

    match (settings, user_contexts) {
        (Some(settings), Some(user_contexts)) => Ok(ImportPlan {
            settings,
            translations,
            user_contexts,
        }),
        _ => Err(DataError::InvalidImport(vec![ImportIssue::new(
            "$",
            "incomplete payload",
        )])),
    }
}

fn check_settings(value: &Value, issues: &mut Vec<ImportIssue>) -> Option<Settings> {
    let Some(object) = value.as_object() else {
        issues.push(ImportIssue::new("settings", "expected an object"));
        return None;
    };

    let before = issues.len();
    for key in REQUIRED_SETTINGS {
        match object.get(key) {
            None => issues.push(ImportIssue::new(
                format!("settings.{}", key),
                "missing property",
            )),
            Some(v) if !v.is_string() => issues.push(ImportIssue::new(
                format!("settings.{}", key),
                "expected a string",
            )),
            Some(_) => {}
        }
    }
    if let Some(v) = object.get("selectedContext") {
        if !v.is_string() {
            issues.push(ImportIssue::new(
                "settings.selectedContext",
                "expected a string",
            ));
        }
    }
    if issues.len() > before {
        return None;
    }

    match serde_json::from_value::<ExportedSettings>(value.clone()) {
        Ok(exported) => Some(exported.into_settings()),
        Err(e) => {
            issues.push(ImportIssue::new("settings", e.to_string()));
            None
        }
    }
}

/// Validate contexts and keep the user ones
fn check_contexts(value: &Value, issues: &mut Vec<ImportIssue>) -> Option<Vec<Context>> {
    let Some(items) = value.as_array() else {
        issues.push(ImportIssue::new("contexts", "expected an array"));
        return None;
    };

    let before = issues.len();
    let mut contexts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let name = item.get("name").and_then(Value::as_str);
        let prompt = item.get("prompt").and_then(Value::as_str);
        if name.is_none() {
            issues.push(ImportIssue::new(
                format!("contexts[{}].name", index),
                "expected a string",
            ));
        }
        if prompt.is_none() {
            issues.push(ImportIssue::new(
                format!("contexts[{}].prompt", index),
                "expected a string",
            ));
        }
        if let (Some(name), Some(prompt)) = (name, prompt) {
            if !is_default_context(name) {
                contexts.push(Context::new(name, prompt));
            }
        }
    }

    (issues.len() == before).then_some(contexts)
}

fn check_translations(value: &Value, issues: &mut Vec<ImportIssue>) -> Option<Vec<Translation>> {
    let Some(items) = value.as_array() else {
        issues.push(ImportIssue::new("translations", "expected an array"));
        return None;
    };

    let before = issues.len();
    let mut translations = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            issues.push(ImportIssue::new(
                format!("translations[{}]", index),
                "expected an object",
            ));
            continue;
        }
        match serde_json::from_value::<Translation>(item.clone()) {
            Ok(translation) => translations.push(translation),
            Err(e) => issues.push(ImportIssue::new(
                format!("translations[{}]", index),
                e.to_string(),
            )),
        }
    }

    (issues.len() == before).then_some(translations)
}
