use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{AppError, DataError};
use crate::data::{ContextStore, DataTransfer, HistoryStore, RoutineStore, SettingsStore};
use crate::models::{ApiValidation, Translation, TranslationOutcome};
use crate::providers::Provider;
use crate::providers::openai::{CompletionCall, OpenAI, OpenAIResponse};
use crate::storage::{SqliteStore, Storage};
use crate::translation::{SourceSelection, TargetSelection, TranslationGateway, TranslationService};

/// Main application controller
///
/// Wires the storage backend, the HTTP provider and the stores together
/// and drives remote calls behind a spinner.
pub struct Controller<P = OpenAI> {
    config: Config,
    storage: Storage,
    service: TranslationService<P>,
    settings: SettingsStore,
    contexts: ContextStore,
    history: HistoryStore,
    routines: RoutineStore,
    transfer: DataTransfer,
    show_progress: bool,
}

impl Controller<OpenAI> {
    /// Create a controller backed by SQLite and the HTTP provider
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let store = match &config.database_path {
            Some(path) => SqliteStore::new(path)?,
            None => SqliteStore::new_default()?,
        };
        debug!("Using database at {:?}", store.path());

        let mut provider = OpenAI::new(config.api.timeout_secs);
        if let Some(referer) = &config.api.referer {
            provider = provider.with_referer(referer.clone());
        }

        Ok(Self::from_parts(config, Storage::new(Arc::new(store)), provider))
    }
}

impl<P> Controller<P>
where
    P: Provider<Request = CompletionCall, Response = OpenAIResponse>,
{
    /// Create a controller from already built parts
    pub fn from_parts(config: Config, storage: Storage, provider: P) -> Self {
        let gateway = TranslationGateway::new(provider, config.api.app_name.clone());

        Self {
            service: TranslationService::new(gateway, storage.clone()),
            settings: SettingsStore::new(storage.clone()),
            contexts: ContextStore::new(storage.clone()),
            history: HistoryStore::new(storage.clone()),
            routines: RoutineStore::new(storage.clone()),
            transfer: DataTransfer::new(storage.clone()),
            storage,
            config,
            show_progress: true,
        }
    }

    /// Create a controller over an in-memory store, without spinners
    pub fn new_for_test(provider: P) -> Self {
        let mut controller = Self::from_parts(Config::default(), Storage::in_memory(), provider);
        controller.show_progress = false;
        controller
    }

    pub fn set_show_progress(&mut self, show_progress: bool) {
        self.show_progress = show_progress;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn service(&self) -> &TranslationService<P> {
        &self.service
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn routines(&self) -> &RoutineStore {
        &self.routines
    }

    pub fn transfer(&self) -> &DataTransfer {
        &self.transfer
    }

    /// Run `task` while a spinner shows `message`
    async fn with_spinner<T, F>(&self, message: &str, task: F) -> T
    where
        F: Future<Output = T>,
    {
        if !self.show_progress {
            return task.await;
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let output = task.await;
        spinner.finish_and_clear();
        output
    }

    /// Translate `text` and record it in history
    pub async fn translate(
        &self,
        text: &str,
        source: SourceSelection,
        targets: TargetSelection,
    ) -> Result<TranslationOutcome, AppError> {
        let outcome = self
            .with_spinner(
                "Translating",
                self.service.perform_translation(text, source, targets),
            )
            .await?;

        info!("Saved translation {}", outcome.translation_data.id);
        Ok(outcome)
    }

    /// Find a translation in history, then among the saved ones
    pub fn find_translation(&self, id: &str) -> Option<Translation> {
        self.history
            .history()
            .into_iter()
            .chain(self.history.saved())
            .find(|t| t.id == id)
    }

    /// Generate examples for the stored translation `id`
    pub async fn generate_examples(&self, id: &str) -> Result<Vec<Translation>, AppError> {
        let original = self
            .find_translation(id)
            .ok_or_else(|| DataError::NotFound(format!("Translation {}", id)))?;

        let examples = self
            .with_spinner(
                "Generating examples",
                self.service.generate_examples_for_translation(&original),
            )
            .await?;

        Ok(examples)
    }

    /// Probe the API with the stored settings
    pub async fn validate_api(&self) -> ApiValidation {
        let settings = self.settings.get_settings();
        self.with_spinner(
            "Checking API configuration",
            self.service.validate_api_configuration(&settings),
        )
        .await
    }
}
