// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use fjalor::app_config::{Config, DEFAULT_CONFIG_FILE, LogLevel};
use fjalor::app_controller::Controller;
use fjalor::language_utils::language_display_name;
use fjalor::models::{RoutineData, RoutineStepData, SettingsUpdate, Translation};
use fjalor::translation::{SourceSelection, TargetSelection};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for TargetSelection to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTargetSelection {
    Both,
    Target1,
    Target2,
}

impl From<CliTargetSelection> for TargetSelection {
    fn from(cli_target: CliTargetSelection) -> Self {
        match cli_target {
            CliTargetSelection::Both => TargetSelection::Both,
            CliTargetSelection::Target1 => TargetSelection::Target1,
            CliTargetSelection::Target2 => TargetSelection::Target2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    /// Saved translations as CSV
    Csv,
    /// Settings and contexts as JSON
    Settings,
    /// Settings, history and contexts as JSON
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportKind {
    /// Settings and contexts
    Settings,
    /// Settings, history and contexts
    All,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text into the configured languages
    Translate(TranslateArgs),

    /// Generate example sentences for a stored translation
    Examples {
        /// Id of the translation in history or saved
        id: String,
    },

    /// Show or edit translation history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Manage saved translations
    #[command(subcommand)]
    Saved(SavedCommand),

    /// Manage translation contexts
    #[command(subcommand)]
    Contexts(ContextsCommand),

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Send a probe request with the current settings
    ValidateApi,

    /// Export data
    Export {
        #[arg(value_enum)]
        kind: ExportKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import data from a JSON export
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// File to import
        file: PathBuf,
    },

    /// Manage routines
    #[command(subcommand)]
    Routines(RoutinesCommand),

    /// Delete all stored data
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completions for fjalor
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: String,

    /// Source language code, or 'autodetect'
    #[arg(short, long, default_value = "autodetect")]
    source: String,

    /// Which configured languages receive a translation
    #[arg(short, long, value_enum, default_value = "both")]
    target: CliTargetSelection,

    /// Save the translation right away
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List history, newest first
    List {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete an entry from history
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// List saved translations, newest first
    List,
    /// Copy a history entry into saved
    Add { id: String },
    /// Remove a saved translation
    Remove { id: String },
    /// Remove every saved translation
    Clear,
}

#[derive(Subcommand, Debug)]
enum ContextsCommand {
    /// List all contexts
    List,
    /// Add a user context
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        prompt: String,
    },
    /// Delete a user context
    Delete { name: String },
    /// Select the context used for translations
    Select { name: String },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set(SettingsArgs),
    /// Show or change the theme preference
    Theme { value: Option<String> },
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(long)]
    mother_language: Option<String>,
    #[arg(long)]
    second_language: Option<String>,
    #[arg(long)]
    learning_language: Option<String>,
    #[arg(long)]
    api_link: Option<String>,
    #[arg(long, env = "FJALOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long)]
    ai_model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum RoutinesCommand {
    /// List routines
    List,
    /// Show one routine with its steps
    Show { id: String },
    /// Create a routine
    Create(RoutineArgs),
    /// Replace a routine
    Update {
        id: String,
        #[command(flatten)]
        routine: RoutineArgs,
    },
    /// Delete a routine
    Delete { id: String },
    /// List every tag in use
    Tags,
    /// Search routines
    Search {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        tag: String,
    },
    /// Export routines as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace routines with the ones in a JSON file
    Import { file: PathBuf },
}

#[derive(Args, Debug)]
struct RoutineArgs {
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    description: Option<String>,
    /// Comma-separated tags
    #[arg(short, long)]
    tags: String,
    /// Step title; repeat for several steps
    #[arg(short, long = "step")]
    steps: Vec<String>,
}

impl From<RoutineArgs> for RoutineData {
    fn from(args: RoutineArgs) -> Self {
        RoutineData {
            name: args.name,
            description: args.description,
            tags_string: Some(args.tags),
            tags: Vec::new(),
            steps: args.steps.into_iter().map(RoutineStepData::titled).collect(),
        }
    }
}

/// Fjalor - AI-assisted translation helper
///
/// Translates short texts into your configured languages through an
/// OpenAI-compatible chat-completion API and keeps a local history.
#[derive(Parser, Debug)]
#[command(name = "fjalor")]
#[command(version)]
#[command(about = "AI-assisted translation helper")]
#[command(long_about = "Fjalor translates text into up to two of your configured languages using an OpenAI-compatible API.

EXAMPLES:
    fjalor settings set --api-key sk-...         # Configure the API key
    fjalor translate \"Good morning\"               # Detect the source, translate to both targets
    fjalor translate -s sq -t target1 \"Mirëdita\"  # Fixed source, first target only
    fjalor examples translation-abc123           # Generate example sentences
    fjalor export csv -o saved.csv               # Export saved translations
    fjalor completions bash > fjalor.bash        # Generate bash completions

CONFIGURATION:
    Client configuration is stored in fjalor.json by default. If the file
    doesn't exist, a default one is created automatically. Translation
    settings are kept in the local database.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    /// ANSI colour and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, label) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour,
                now,
                label,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace lets every later max-level change take effect
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Warn);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "fjalor", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.into());

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Translate(args) => {
            let outcome = controller
                .translate(&args.text, SourceSelection::from(args.source.as_str()), args.target.into())
                .await?;
            print_translation(&outcome.translation_data);

            if args.save {
                controller
                    .history()
                    .save_translation(&outcome.translation_data)?;
                println!("Saved.");
            }
        }
        Commands::Examples { id } => {
            let examples = controller.generate_examples(&id).await?;
            if examples.is_empty() {
                println!("No examples could be read from the response.");
            }
            for example in &examples {
                print_translation(example);
            }
        }
        Commands::History(command) => run_history(controller, command)?,
        Commands::Saved(command) => run_saved(controller, command)?,
        Commands::Contexts(command) => run_contexts(controller, command)?,
        Commands::Settings(command) => run_settings(controller, command)?,
        Commands::ValidateApi => {
            let validation = controller.validate_api().await;
            match validation.error {
                None => println!("API configuration is valid."),
                Some(error) => return Err(anyhow!("API configuration is invalid: {}", error)),
            }
        }
        Commands::Export { kind, output } => {
            let transfer = controller.transfer();
            let content = match kind {
                ExportKind::Csv => transfer.export_translations()?,
                ExportKind::Settings => transfer.export_settings()?,
                ExportKind::All => transfer.export_all_data()?,
            };
            write_output(&content, output.as_deref())?;
        }
        Commands::Import { kind, file } => {
            let json = read_input(&file)?;
            match kind {
                ImportKind::Settings => controller.transfer().import_settings(&json)?,
                ImportKind::All => controller.transfer().import_all_data(&json)?,
            }
            println!("Import complete.");
        }
        Commands::Routines(command) => run_routines(controller, command)?,
        Commands::Reset { yes } => {
            if !yes && !confirm("Delete all settings, translations, contexts and routines?")? {
                println!("Aborted.");
                return Ok(());
            }
            controller.settings().reset_app()?;
            println!("All data deleted.");
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn run_history(controller: &Controller, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List { limit } => {
            let overview = controller.history().all_translation_data();
            let shown = limit.unwrap_or(overview.total_count);
            for translation in overview.all_translations.iter().take(shown) {
                print_translation(translation);
            }
            println!("{} translation(s) in history", overview.total_count);
        }
        HistoryCommand::Delete { id } => {
            if !controller.history().delete_translation(&id) {
                return Err(anyhow!("Failed to delete translation {}", id));
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn run_saved(controller: &Controller, command: SavedCommand) -> Result<()> {
    let history = controller.history();
    match command {
        SavedCommand::List => {
            let overview = history.all_translation_data();
            for translation in &overview.saved_translations {
                print_translation(translation);
            }
            println!("{} saved translation(s)", history.saved_count());
        }
        SavedCommand::Add { id } => {
            if !history.save_translation_by_id(&id) {
                return Err(anyhow!("Translation not found in history: {}", id));
            }
            println!("Saved {}", id);
        }
        SavedCommand::Remove { id } => {
            if !history.unsave_translation_by_id(&id) {
                return Err(anyhow!("Failed to remove saved translation {}", id));
            }
            println!("Removed {}", id);
        }
        SavedCommand::Clear => {
            history.clear_all_saved()?;
            println!("Saved translations cleared.");
        }
    }
    Ok(())
}

fn run_contexts(controller: &Controller, command: ContextsCommand) -> Result<()> {
    let contexts = controller.contexts();
    match command {
        ContextsCommand::List => {
            let selected = contexts.selected_context();
            for context in contexts.all_contexts() {
                let marker = if context.name == selected { "*" } else { " " };
                println!("{} {}: {}", marker, context.name, context.prompt);
            }
        }
        ContextsCommand::Add { name, prompt } => {
            let context = contexts.add_context(&name, &prompt)?;
            println!("Added context '{}'", context.name);
        }
        ContextsCommand::Delete { name } => {
            contexts.delete_context(&name)?;
            println!("Deleted context '{}'", name);
        }
        ContextsCommand::Select { name } => {
            if contexts.context_by_name(&name).is_none() {
                return Err(anyhow!("Context not found: {}", name));
            }
            if !contexts.set_selected_context(&name) {
                return Err(anyhow!("Failed to select context {}", name));
            }
            println!("Selected context '{}'", name);
        }
    }
    Ok(())
}

fn run_settings(controller: &Controller, command: SettingsCommand) -> Result<()> {
    let settings_store = controller.settings();
    match command {
        SettingsCommand::Show => {
            let settings = settings_store.get_settings();
            println!(
                "Mother language:   {} ({})",
                settings.mother_language,
                language_display_name(&settings.mother_language)
            );
            println!(
                "Second language:   {} ({})",
                settings.second_language,
                language_display_name(&settings.second_language)
            );
            println!(
                "Learning language: {} ({})",
                settings.learning_language,
                language_display_name(&settings.learning_language)
            );
            println!("API link:          {}", settings.api_link);
            println!("API key:           {}", mask_secret(&settings.api_key));
            println!("AI model:          {}", settings.ai_model);
            println!("Context:           {}", settings.selected_context);
            println!("Theme:             {}", settings_store.theme());
        }
        SettingsCommand::Set(args) => {
            let update = SettingsUpdate {
                mother_language: args.mother_language,
                second_language: args.second_language,
                learning_language: args.learning_language,
                api_link: args.api_link,
                api_key: args.api_key,
                ai_model: args.ai_model,
                selected_context: None,
            };
            if update.is_empty() {
                return Err(anyhow!("Nothing to update"));
            }
            if !settings_store.update_settings(update) {
                return Err(anyhow!("Failed to save settings"));
            }
            settings_store.mark_setup_completed();
            info!("Settings updated");
            println!("Settings updated.");
        }
        SettingsCommand::Theme { value } => match value {
            Some(theme) => {
                if !settings_store.set_theme(&theme) {
                    return Err(anyhow!("Failed to save theme"));
                }
                println!("Theme set to {}", theme);
            }
            None => println!("{}", settings_store.theme()),
        },
    }
    Ok(())
}

fn run_routines(controller: &Controller, command: RoutinesCommand) -> Result<()> {
    let routines = controller.routines();
    match command {
        RoutinesCommand::List => {
            for routine in routines.list() {
                println!("{}  {} [{}]", routine.id, routine.name, routine.tags.join(", "));
            }
        }
        RoutinesCommand::Show { id } => {
            let routine = routines
                .get_by_id(&id)
                .ok_or_else(|| anyhow!("Routine not found: {}", id))?;
            println!("{} [{}]", routine.name, routine.tags.join(", "));
            if !routine.description.is_empty() {
                println!("{}", routine.description);
            }
            for step in &routine.steps {
                println!("  {}. {}", step.order, step.title);
            }
        }
        RoutinesCommand::Create(args) => {
            let routine = routines.create(&args.into())?;
            println!("Created routine {}", routine.id);
        }
        RoutinesCommand::Update { id, routine } => {
            let updated = routines.update(&id, &routine.into())?;
            println!("Updated routine {}", updated.id);
        }
        RoutinesCommand::Delete { id } => {
            routines.delete(&id)?;
            println!("Deleted routine {}", id);
        }
        RoutinesCommand::Tags => {
            for tag in routines.tags() {
                println!("{}", tag);
            }
        }
        RoutinesCommand::Search { query, tag } => {
            for routine in routines.search(&query, &tag) {
                println!("{}  {} [{}]", routine.id, routine.name, routine.tags.join(", "));
            }
        }
        RoutinesCommand::Export { output } => {
            write_output(&routines.export()?, output.as_deref())?;
        }
        RoutinesCommand::Import { file } => {
            let imported = routines.import(&read_input(&file)?)?;
            println!("Imported {} routine(s)", imported);
        }
    }
    Ok(())
}

fn print_translation(translation: &Translation) {
    println!("[{}] {} ({})", translation.id, translation.timestamp, translation.kind);
    println!("  {}: {}", translation.source_language, translation.source_text);
    if !translation.target_language1.is_empty() {
        println!("  {}: {}", translation.target_language1, translation.translation1);
    }
    if !translation.target_language2.is_empty() {
        println!("  {}: {}", translation.target_language2, translation.translation2);
    }
}

/// Keep the last four characters of a secret visible
fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().skip(count.saturating_sub(4)).collect();
    format!("{}{}", "*".repeat(count.saturating_sub(4)), visible)
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .context(format!("Failed to write export to {}", path.display()))?;
            println!("Written to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
