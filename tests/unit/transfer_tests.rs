/*!
 * Tests for data export and import
 */

use serde_json::{Value, json};

use fjalor::data::{ContextStore, DataTransfer, HistoryStore, escape_csv_field};
use fjalor::errors::{DataError, ImportIssue};
use fjalor::storage::Storage;

use crate::common;

fn transfer() -> (DataTransfer, Storage) {
    common::init_logging();
    let storage = common::configured_storage();
    (DataTransfer::new(storage.clone()), storage)
}

fn valid_settings() -> Value {
    json!({
        "motherlanguage": "de",
        "secondlanguage": "it",
        "learninglanguage": "ja",
        "apiLink": "https://api.example.com/v1/chat/completions",
        "apiKey": "imported-key",
        "aiModel": "some/model"
    })
}

/// Test quote doubling in CSV fields
#[test]
fn test_escape_csv_field_shouldDoubleQuotes() {
    assert_eq!(escape_csv_field(r#"He said "hi""#), r#"He said ""hi"""#);
    assert_eq!(escape_csv_field("plain, text"), "plain, text");
}

/// Test the CSV layout of saved translations
#[test]
fn test_export_translations_shouldQuoteTextColumns() {
    let (transfer, storage) = transfer();
    let history = HistoryStore::new(storage);
    let mut record = common::sample_translation("t-1", r#"He said "hi""#, "2024-02-02T10:00:00.000Z");
    record.translation2 = String::new();
    record.target_language2 = String::new();
    assert!(history.save_history(&[record]));
    assert!(history.save_translation_by_id("t-1"));

    let csv = transfer.export_translations().unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "ID,Timestamp,Source Language,Target Language 1,Target Language 2,AI Model,Source Text,Translation 1,Translation 2,Context,Type"
    );
    assert_eq!(
        lines[1],
        r#"t-1,2024-02-02T10:00:00.000Z,en,sq,,openai/gpt-3.5-turbo,"He said ""hi""","He said ""hi"" (sq)","","Expert","user_input""#
    );
    assert_eq!(lines.len(), 2);
}

/// Test exporting with nothing saved
#[test]
fn test_export_translations_withNothingSaved_shouldFail() {
    let (transfer, _storage) = transfer();

    let error = transfer.export_translations().unwrap_err();

    assert!(matches!(error, DataError::NothingToExport(_)));
    assert_eq!(error.to_string(), "No saved translations to export");
    assert_eq!(transfer.saved_translations_csv(), "");
}

/// Test the settings export shape
#[test]
fn test_export_settings_shouldIncludeBuiltinAndUserContexts() {
    let (transfer, storage) = transfer();
    ContextStore::new(storage).add_context("Casual", "Keep it light.").unwrap();

    let exported: Value = serde_json::from_str(&transfer.export_settings().unwrap()).unwrap();

    assert_eq!(exported["settings"]["apiKey"], "test-key");
    assert_eq!(exported["settings"]["motherlanguage"], "en");
    assert_eq!(exported["contexts"][0]["name"], "Expert");
    assert_eq!(exported["contexts"][1]["name"], "Casual");
    assert!(exported.get("translations").is_none());
}

/// Test the full export metadata
#[test]
fn test_export_all_data_shouldCountRecords() {
    let (transfer, storage) = transfer();
    let history = HistoryStore::new(storage);
    assert!(history.add_translation(common::sample_translation("a", "one", "2024-01-01T00:00:00.000Z")));
    assert!(history.add_translation(common::sample_translation("b", "two", "2024-01-02T00:00:00.000Z")));

    let exported: Value = serde_json::from_str(&transfer.export_all_data().unwrap()).unwrap();

    assert_eq!(exported["metadata"]["version"], "1.0");
    assert_eq!(exported["metadata"]["counts"]["translations"], 2);
    assert_eq!(exported["metadata"]["counts"]["contexts"], 1);
    assert!(exported["metadata"]["exportDate"].is_string());
    assert_eq!(exported["translations"][0]["id"], "b");
}

/// Test importing settings replaces settings and user contexts only
#[test]
fn test_import_settings_shouldReplaceSettingsAndContexts() {
    let (transfer, storage) = transfer();
    let history = HistoryStore::new(storage.clone());
    assert!(history.add_translation(common::sample_translation("keep", "keep", "2024-01-01T00:00:00.000Z")));

    let payload = json!({
        "settings": valid_settings(),
        "contexts": [
            {"name": "Expert", "prompt": "overridden?"},
            {"name": "Poetic", "prompt": "Rhyme when possible."}
        ]
    });
    transfer.import_settings(&payload.to_string()).unwrap();

    let settings = fjalor::data::SettingsStore::new(storage.clone()).get_settings();
    assert_eq!(settings.mother_language, "de");
    assert_eq!(settings.api_key, "imported-key");
    assert_eq!(settings.selected_context, "Expert");

    let contexts = ContextStore::new(storage);
    let names: Vec<String> = contexts.user_contexts().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Poetic"]);
    assert_ne!(contexts.all_contexts()[0].prompt, "overridden?");
    assert_eq!(history.history().len(), 1);
}

/// Test every schema problem is reported and nothing is written
#[test]
fn test_import_all_data_withSchemaProblems_shouldReportAllAndWriteNothing() {
    let (transfer, storage) = transfer();
    let before = transfer.export_all_data().unwrap();

    let mut settings = valid_settings();
    settings["apiKey"] = json!(42);
    if let Some(map) = settings.as_object_mut() {
        map.remove("aiModel");
    }
    let payload = json!({
        "settings": settings,
        "translations": [{"id": "x"}, "not an object"],
        "contexts": [{"name": "NoPrompt"}]
    });

    let error = transfer.import_all_data(&payload.to_string()).unwrap_err();
    let DataError::InvalidImport(issues) = error else {
        panic!("expected schema issues");
    };

    assert!(issues.contains(&ImportIssue::new("settings.apiKey", "expected a string")));
    assert!(issues.contains(&ImportIssue::new("settings.aiModel", "missing property")));
    assert!(issues.contains(&ImportIssue::new("translations[1]", "expected an object")));
    assert!(issues.contains(&ImportIssue::new("contexts[0].prompt", "expected a string")));

    let after = DataTransfer::new(storage).export_all_data().unwrap();
    let strip_date = |raw: &str| {
        let mut value: Value = serde_json::from_str(raw).unwrap();
        value["metadata"]["exportDate"] = Value::Null;
        value
    };
    assert_eq!(strip_date(&before), strip_date(&after));
}

/// Test missing sections and malformed JSON
#[test]
fn test_import_all_data_withBadPayload_shouldFail() {
    let (transfer, _storage) = transfer();

    let error = transfer.import_all_data("{ not json").unwrap_err();
    assert!(matches!(error, DataError::MalformedImport(_)));
    assert!(error.to_string().starts_with("Invalid import file: "));

    let error = transfer
        .import_all_data(&json!({"settings": valid_settings(), "contexts": []}).to_string())
        .unwrap_err();
    let DataError::InvalidImport(issues) = error else {
        panic!("expected schema issues");
    };
    assert_eq!(issues, vec![ImportIssue::new("translations", "missing section")]);

    let error = transfer.import_settings("[]").unwrap_err();
    assert!(matches!(error, DataError::InvalidImport(_)));
}
