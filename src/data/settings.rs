use log::{error, info};

use crate::errors::DataError;
use crate::models::{Settings, SettingsUpdate};
use crate::storage::{Storage, keys};

/// Theme used when none has been chosen
pub const DEFAULT_THEME: &str = "auto";

/// Repository for settings, theme preference and the setup flag
#[derive(Clone)]
pub struct SettingsStore {
    storage: Storage,
}

impl SettingsStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Stored settings over the defaults
    pub fn get_settings(&self) -> Settings {
        self.storage.load(keys::SETTINGS, Settings::default())
    }

    /// Merge a partial update into the stored settings
    pub fn update_settings(&self, update: SettingsUpdate) -> bool {
        let mut settings = self.get_settings();
        settings.merge(update);
        self.storage.save(keys::SETTINGS, &settings)
    }

    pub fn theme(&self) -> String {
        self.storage
            .load_opt::<String>(keys::THEME)
            .filter(|theme| !theme.is_empty())
            .unwrap_or_else(|| DEFAULT_THEME.to_string())
    }

    pub fn set_theme(&self, theme: &str) -> bool {
        self.storage.save(keys::THEME, theme)
    }

    pub fn is_setup_completed(&self) -> bool {
        self.storage.load_opt::<String>(keys::SETUP_COMPLETED).as_deref() == Some("true")
    }

    pub fn mark_setup_completed(&self) -> bool {
        self.storage.save(keys::SETUP_COMPLETED, "true")
    }

    pub fn reset_setup(&self) -> bool {
        self.storage.remove(keys::SETUP_COMPLETED)
    }

    /// Remove every persisted value
    pub fn reset_app(&self) -> Result<(), DataError> {
        if self.storage.clear() {
            info!("Application data cleared");
            Ok(())
        } else {
            error!("Reset app failed");
            Err(DataError::Persistence(
                "Failed to clear application data".to_string(),
            ))
        }
    }
}
