/*!
 * Adapters over the persisted collections.
 *
 * Every adapter wraps a `Storage` handle and follows a read-modify-write
 * contract: read the whole collection, change it in memory, write it back.
 *
 * - `history`: history and saved translations
 * - `contexts`: built-in and user translation contexts
 * - `settings`: user settings, theme, setup flag and full reset
 * - `transfer`: CSV and JSON export, JSON import
 * - `routines`: user checklists
 */

pub mod contexts;
pub mod history;
pub mod routines;
pub mod settings;
pub mod transfer;

pub use contexts::{
    ContextStore, default_contexts, find_context, is_default_context, is_deletable_context,
    validate_context,
};
pub use history::{HistoryStore, SavedLookup, TranslationOverview};
pub use routines::RoutineStore;
pub use settings::SettingsStore;
pub use transfer::{DataTransfer, escape_csv_field};
