/*!
 * Tests for routines
 */

use fjalor::data::RoutineStore;
use fjalor::errors::DataError;
use fjalor::models::{RoutineData, RoutineStepData};
use fjalor::storage::Storage;

fn store() -> RoutineStore {
    RoutineStore::new(Storage::in_memory())
}

fn morning_routine() -> RoutineData {
    RoutineData {
        name: "  Morning review ".to_string(),
        description: Some(" Daily vocabulary ".to_string()),
        tags_string: Some("daily, vocab, ,daily".to_string()),
        tags: Vec::new(),
        steps: vec![
            RoutineStepData::titled("Read saved words"),
            RoutineStepData::titled("   "),
            RoutineStepData::titled("Write three sentences"),
        ],
    }
}

/// Test submitted data is cleaned on create
#[test]
fn test_create_routine_shouldCleanNameTagsAndSteps() {
    let routines = store();

    let routine = routines.create(&morning_routine()).unwrap();

    assert_eq!(routine.name, "Morning review");
    assert_eq!(routine.description, "Daily vocabulary");
    assert_eq!(routine.tags, vec!["daily", "vocab"]);
    assert_eq!(routine.steps.len(), 2);
    assert_eq!(routine.steps[0].order, 1);
    assert_eq!(routine.steps[1].title, "Write three sentences");
    assert_eq!(routine.steps[1].order, 2);
    assert_ne!(routine.steps[0].id, routine.steps[1].id);
    assert_eq!(routine.created_at, routine.updated_at);
    assert_eq!(routines.get_by_id(&routine.id), Some(routine));
}

/// Test the required fields
#[test]
fn test_create_routine_withoutNameOrTags_shouldFail() {
    let routines = store();

    let mut nameless = morning_routine();
    nameless.name = " ".to_string();
    let error = routines.create(&nameless).unwrap_err();
    assert_eq!(error.to_string(), "Routine name is required");

    let mut untagged = morning_routine();
    untagged.tags_string = Some(" , ".to_string());
    let error = routines.create(&untagged).unwrap_err();
    assert_eq!(error.to_string(), "At least one tag is required");

    assert!(routines.list().is_empty());
}

/// Test updates keep identity and creation time
#[test]
fn test_update_routine_shouldKeepIdAndCreatedAt() {
    let routines = store();
    let created = routines.create(&morning_routine()).unwrap();

    let mut changed = morning_routine();
    changed.name = "Evening review".to_string();
    changed.tags = vec!["evening".to_string()];
    changed.steps = vec![RoutineStepData {
        id: None,
        title: "Listen".to_string(),
        order: Some(5),
    }];
    let updated = routines.update(&created.id, &changed).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.tags, vec!["evening"]);
    assert_eq!(updated.steps[0].order, 5);
    assert_eq!(routines.list().len(), 1);

    assert!(matches!(
        routines.update("missing", &changed),
        Err(DataError::NotFound(_))
    ));
}

/// Test search by tag and by text, and the tag listing
#[test]
fn test_search_and_tags_shouldFilterRoutines() {
    let routines = store();
    routines.create(&morning_routine()).unwrap();
    let mut grammar = morning_routine();
    grammar.name = "Grammar drills".to_string();
    grammar.description = None;
    grammar.tags_string = Some("grammar, weekly".to_string());
    routines.create(&grammar).unwrap();

    assert_eq!(routines.tags(), vec!["daily", "grammar", "vocab", "weekly"]);
    assert_eq!(routines.search("", "").len(), 2);
    assert_eq!(routines.search("", "weekly")[0].name, "Grammar drills");
    assert_eq!(routines.search("VOCAB", "")[0].name, "Morning review");
    assert!(routines.search("drills", "daily").is_empty());
}

/// Test delete of existing and unknown routines
#[test]
fn test_delete_routine_shouldRemoveOnlyThatRoutine() {
    let routines = store();
    let first = routines.create(&morning_routine()).unwrap();
    let second = routines.create(&morning_routine()).unwrap();

    routines.delete(&first.id).unwrap();

    assert_eq!(routines.list(), vec![second]);
    assert!(matches!(routines.delete(&first.id), Err(DataError::NotFound(_))));
}

/// Test export then import into an empty store
#[test]
fn test_export_import_shouldRestoreRoutines() {
    let source = store();
    assert!(matches!(source.export(), Err(DataError::NothingToExport(_))));
    source.create(&morning_routine()).unwrap();

    let exported = source.export().unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(value["version"], "1.0.0");
    assert!(value["exportedAt"].is_string());

    let target = store();
    assert_eq!(target.import(&exported).unwrap(), 1);
    assert_eq!(target.list()[0].name, "Morning review");
    assert_eq!(target.list()[0].steps.len(), 2);
}

/// Test imports skip invalid routines and reject empty results
#[test]
fn test_import_withInvalidEntries_shouldKeepValidOnly() {
    let routines = store();
    let payload = r#"[
        {"name": "Kept", "tags": ["a", " a ", ""], "steps": [{"title": "One"}, {"title": " "}]},
        {"name": "", "tags": ["b"]},
        {"name": "No tags", "tags": []},
        "garbage"
    ]"#;

    assert_eq!(routines.import(payload).unwrap(), 1);
    let kept = &routines.list()[0];
    assert_eq!(kept.tags, vec!["a"]);
    assert_eq!(kept.steps.len(), 1);

    let error = routines.import(r#"{"routines": [{"name": "x"}]}"#).unwrap_err();
    assert_eq!(error.to_string(), "No valid routines found in import data");
    assert!(matches!(routines.import("nope"), Err(DataError::MalformedImport(_))));
    assert_eq!(routines.list().len(), 1);
}
