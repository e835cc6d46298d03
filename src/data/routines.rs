/*!
 * User routines: named checklists of ordered steps.
 *
 * Submitted data is validated, then cleaned:
 * - name and description are trimmed
 * - tags are trimmed, blank tags dropped and duplicates removed
 * - steps with a blank title are dropped; steps without an explicit order
 *   get their 1-based position among the kept steps
 */

use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use crate::errors::DataError;
use crate::models::{Routine, RoutineData, RoutineStep, RoutineStepData, now_iso};
use crate::storage::{Storage, keys};

/// Version written into routine exports
pub const ROUTINES_EXPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutinesExport<'a> {
    version: &'a str,
    exported_at: String,
    routines: &'a [Routine],
}

/// Trim, drop blanks and remove duplicates, keeping first occurrences
fn clean_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}

/// Tags of submitted data, falling back to the comma-separated string
fn submitted_tags(data: &RoutineData) -> Vec<String> {
    if data.tags.is_empty() {
        if let Some(tags_string) = &data.tags_string {
            return clean_tags(tags_string.split(','));
        }
    }
    clean_tags(&data.tags)
}

fn validate_routine_data(data: &RoutineData) -> Result<Vec<String>, DataError> {
    if data.name.trim().is_empty() {
        return Err(DataError::Validation(vec![
            "Routine name is required".to_string(),
        ]));
    }

    let tags = submitted_tags(data);
    if tags.is_empty() {
        return Err(DataError::Validation(vec![
            "At least one tag is required".to_string(),
        ]));
    }

    Ok(tags)
}

/// Repository for the routines collection
#[derive(Clone)]
pub struct RoutineStore {
    storage: Storage,
}

impl RoutineStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Vec<Routine> {
        self.storage.load(keys::ROUTINES, Vec::new())
    }

    fn save_all(&self, routines: &[Routine]) -> Result<(), DataError> {
        if self.storage.save(keys::ROUTINES, routines) {
            Ok(())
        } else {
            error!("Error saving routines");
            Err(DataError::Persistence("Failed to save routines".to_string()))
        }
    }

    fn clean_steps(&self, steps: &[RoutineStepData]) -> Vec<RoutineStep> {
        steps
            .iter()
            .map(|step| (step, step.title.trim()))
            .filter(|(_, title)| !title.is_empty())
            .enumerate()
            .map(|(index, (step, title))| RoutineStep {
                id: step
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| self.storage.generate_id()),
                title: title.to_string(),
                order: step.order.filter(|o| *o > 0).unwrap_or(index as u32 + 1),
            })
            .collect()
    }

    fn build_routine(&self, data: &RoutineData, tags: Vec<String>, existing: Option<&Routine>) -> Routine {
        let now = now_iso();
        Routine {
            id: existing
                .map(|r| r.id.clone())
                .unwrap_or_else(|| self.storage.generate_id()),
            name: data.name.trim().to_string(),
            description: data
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            tags,
            steps: self.clean_steps(&data.steps),
            created_at: existing
                .map(|r| r.created_at.clone())
                .unwrap_or_else(|| now.clone()),
            updated_at: now,
        }
    }

    /// Validate and insert a routine at the front of the list
    pub fn create(&self, data: &RoutineData) -> Result<Routine, DataError> {
        let tags = validate_routine_data(data)?;

        let mut routines = self.list();
        let routine = self.build_routine(data, tags, None);
        routines.insert(0, routine.clone());
        self.save_all(&routines)?;

        info!("Created routine: {}", routine.name);
        Ok(routine)
    }

    /// Replace a routine, keeping its id and creation time
    pub fn update(&self, id: &str, data: &RoutineData) -> Result<Routine, DataError> {
        let tags = validate_routine_data(data)?;

        let mut routines = self.list();
        let index = routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DataError::NotFound("Routine".to_string()))?;

        let updated = self.build_routine(data, tags, Some(&routines[index]));
        routines[index] = updated.clone();
        self.save_all(&routines)?;

        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), DataError> {
        let routines = self.list();
        let remaining: Vec<Routine> = routines.iter().filter(|r| r.id != id).cloned().collect();

        if remaining.len() == routines.len() {
            return Err(DataError::NotFound("Routine".to_string()));
        }

        self.save_all(&remaining)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Routine> {
        self.list().into_iter().find(|r| r.id == id)
    }

    /// Every tag in use, sorted and unique
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .list()
            .iter()
            .flat_map(|r| r.tags.iter())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Filter by exact tag, then by case-insensitive substring
    ///
    /// The query is matched against name, description and tags. Empty
    /// arguments do not filter.
    pub fn search(&self, query: &str, tag: &str) -> Vec<Routine> {
        let lowered = query.to_lowercase();

        self.list()
            .into_iter()
            .filter(|r| tag.is_empty() || r.tags.iter().any(|t| t == tag))
            .filter(|r| {
                lowered.is_empty()
                    || r.name.to_lowercase().contains(&lowered)
                    || r.description.to_lowercase().contains(&lowered)
                    || r.tags.iter().any(|t| t.to_lowercase().contains(&lowered))
            })
            .collect()
    }

    pub fn export(&self) -> Result<String, DataError> {
        let routines = self.list();
        if routines.is_empty() {
            return Err(DataError::NothingToExport(
                "No routines to export".to_string(),
            ));
        }

        let export = RoutinesExport {
            version: ROUTINES_EXPORT_VERSION,
            exported_at: now_iso(),
            routines: &routines,
        };

        serde_json::to_string_pretty(&export)
            .map_err(|e| DataError::Persistence(format!("Failed to export routines: {}", e)))
    }

    /// Replace all routines with the valid ones in `json`
    ///
    /// Accepts `{"routines": [...]}` or a bare array. Returns how many
    /// routines were imported.
    pub fn import(&self, json: &str) -> Result<usize, DataError> {
        let parsed: Value =
            serde_json::from_str(json).map_err(|e| DataError::MalformedImport(e.to_string()))?;

        let items = match &parsed {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => map
                .get("routines")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        };

        let routines: Vec<Routine> = items
            .iter()
            .filter_map(|item| self.sanitize_imported(item))
            .collect();

        if routines.is_empty() {
            return Err(DataError::Validation(vec![
                "No valid routines found in import data".to_string(),
            ]));
        }

        self.save_all(&routines)?;
        info!("Imported {} routines", routines.len());
        Ok(routines.len())
    }

    /// Clean one imported routine; `None` when it has no name or tags
    fn sanitize_imported(&self, item: &Value) -> Option<Routine> {
        let text = |value: Option<&Value>| {
            value
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let name = text(item.get("name"));
        let tags = clean_tags(
            item.get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(Value::as_str).collect::<Vec<_>>())
                .unwrap_or_default(),
        );
        if name.is_empty() || tags.is_empty() {
            return None;
        }

        let steps: Vec<RoutineStepData> = item
            .get("steps")
            .and_then(Value::as_array)
            .map(|steps| {
                steps
                    .iter()
                    .map(|step| RoutineStepData {
                        id: step.get("id").and_then(Value::as_str).map(str::to_string),
                        title: text(step.get("title")),
                        order: step
                            .get("order")
                            .and_then(Value::as_u64)
                            .and_then(|o| u32::try_from(o).ok()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let now = now_iso();
        let timestamp = |key: &str| {
            item.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| now.clone())
        };

        Some(Routine {
            id: item
                .get("id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.storage.generate_id()),
            name,
            description: text(item.get("description")),
            tags,
            steps: self.clean_steps(&steps),
            created_at: timestamp("createdAt"),
            updated_at: timestamp("updatedAt"),
        })
    }
}
