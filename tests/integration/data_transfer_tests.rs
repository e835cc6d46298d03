/*!
 * Export and re-import across independent stores
 */

use anyhow::Result;

use fjalor::data::{ContextStore, DataTransfer, HistoryStore, SettingsStore};
use fjalor::models::SettingsUpdate;
use fjalor::storage::Storage;

use crate::common;

/// Test that a full export imports into an empty store unchanged
#[test]
fn test_export_all_then_import_all_shouldRoundTrip() -> Result<()> {
    common::init_logging();
    let source = common::configured_storage();

    let history = HistoryStore::new(source.clone());
    assert!(history.add_translation(common::sample_translation("t-1", "One", "2024-01-01T08:00:00.000Z")));
    assert!(history.add_translation(common::sample_translation("t-2", r#"Say "two""#, "2024-01-02T08:00:00.000Z")));

    let contexts = ContextStore::new(source.clone());
    contexts.add_context("Casual", "Keep it light.")?;
    contexts.add_context("Legal", "Use legal terminology.")?;
    assert!(contexts.set_selected_context("Legal"));

    assert!(SettingsStore::new(source.clone()).update_settings(SettingsUpdate {
        learning_language: Some("fr".to_string()),
        ..SettingsUpdate::default()
    }));

    let exported = DataTransfer::new(source.clone()).export_all_data()?;

    let target = Storage::in_memory();
    DataTransfer::new(target.clone()).import_all_data(&exported)?;

    assert_eq!(
        SettingsStore::new(target.clone()).get_settings(),
        SettingsStore::new(source.clone()).get_settings()
    );
    assert_eq!(HistoryStore::new(target.clone()).history(), history.history());
    assert_eq!(ContextStore::new(target.clone()).user_contexts(), contexts.user_contexts());
    assert_eq!(ContextStore::new(target).selected_context(), "Legal");
    Ok(())
}

/// Test that a settings export imports into an empty store unchanged
#[test]
fn test_export_settings_then_import_settings_shouldRoundTrip() -> Result<()> {
    let source = common::configured_storage();
    ContextStore::new(source.clone()).add_context("Casual", "Keep it light.")?;

    let exported = DataTransfer::new(source.clone()).export_settings()?;
    let target = Storage::in_memory();
    DataTransfer::new(target.clone()).import_settings(&exported)?;

    assert_eq!(
        SettingsStore::new(target.clone()).get_settings(),
        SettingsStore::new(source.clone()).get_settings()
    );
    assert_eq!(
        ContextStore::new(target.clone()).all_contexts(),
        ContextStore::new(source).all_contexts()
    );
    assert!(HistoryStore::new(target).history().is_empty());
    Ok(())
}

/// Test importing an export file written to disk
#[test]
fn test_import_all_fromFile_shouldReadExportedJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::configured_storage();
    assert!(HistoryStore::new(source.clone())
        .add_translation(common::sample_translation("t-1", "One", "2024-01-01T08:00:00.000Z")));

    let exported = DataTransfer::new(source).export_all_data()?;
    let path = common::create_test_file(temp_dir.path(), "fjalor-export.json", &exported)?;

    let target = Storage::in_memory();
    DataTransfer::new(target.clone()).import_all_data(&std::fs::read_to_string(path)?)?;

    assert_eq!(HistoryStore::new(target).history()[0].id, "t-1");
    Ok(())
}
