// src/catalog.rs
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::db::DbError;

/// Type used when the caller does not name one.
pub const DEFAULT_EXERCISE_TYPE: &str = "weightlifting";

/// Display name used for records (and the current selection) without a usable name.
pub const FALLBACK_EXERCISE_NAME: &str = "Exercise";

/// Opaque category tag selecting a catalog slice and the matching logged set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseType(String);

impl ExerciseType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Uses `raw` unless it is absent or empty, in which case `fallback` applies.
    #[must_use]
    pub fn resolve(raw: Option<&str>, fallback: &str) -> Self {
        match raw {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ if fallback.is_empty() => Self(DEFAULT_EXERCISE_TYPE.to_string()),
            _ => Self(fallback.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label, e.g. `weightlifting` -> `Weightlifting`, `upper_body` -> `Upper Body`.
    /// Entries in `overrides` win over the built-in labels.
    #[must_use]
    pub fn label(&self, overrides: &BTreeMap<String, String>) -> String {
        if let Some(label) = overrides.get(&self.0) {
            return label.clone();
        }
        match self.0.as_str() {
            "weightlifting" => "Weightlifting".to_string(),
            "cardio" => "Cardio".to_string(),
            "bodyweight" | "body-weight" => "Bodyweight".to_string(),
            "mobility" => "Mobility".to_string(),
            other => title_case(other),
        }
    }
}

impl Default for ExerciseType {
    fn default() -> Self {
        Self(DEFAULT_EXERCISE_TYPE.to_string())
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn title_case(raw: &str) -> String {
    raw.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One exercise definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub equipment: String, // May be empty
}

impl ExerciseRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, equipment: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            equipment: equipment.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            FALLBACK_EXERCISE_NAME
        } else {
            &self.name
        }
    }
}

/// A historical workout entry. Only the fields the picker cares about are kept;
/// a missing type or exercise id is `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkoutLogEntry {
    pub exercise_type: Option<String>,
    pub exercise_id: Option<String>,
}

impl WorkoutLogEntry {
    pub fn new(exercise_type: &str, exercise_id: &str) -> Self {
        Self {
            exercise_type: Some(exercise_type.to_string()),
            exercise_id: Some(exercise_id.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
    #[error("Stored data is malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result of calling an optional collaborator capability.
#[derive(Debug)]
pub enum Capability<T> {
    Supported(T),
    Unsupported,
}

pub trait CatalogSource {
    /// Exercise definitions for one type, in catalog order. Unknown types yield an empty list.
    fn exercises_by_type(&self, exercise_type: &ExerciseType)
        -> Result<Vec<ExerciseRecord>, SourceError>;
}

pub trait LogSource {
    fn workout_logs(&self) -> Result<Vec<WorkoutLogEntry>, SourceError>;
}

/// Collaborator that remembers which exercise was picked per type.
/// Both capabilities are optional; the defaults report `Unsupported`.
pub trait RecencyStore {
    /// Most relevant first.
    fn recent_exercise_ids(
        &self,
        _exercise_type: &ExerciseType,
    ) -> Capability<Result<Vec<String>, SourceError>> {
        Capability::Unsupported
    }

    fn set_selected_exercise_id(
        &self,
        _exercise_type: &ExerciseType,
        _exercise_id: &str,
    ) -> Capability<Result<(), SourceError>> {
        Capability::Unsupported
    }
}

/// A recency collaborator with neither capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecency;

impl RecencyStore for NoRecency {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_on_missing_or_empty() {
        assert_eq!(ExerciseType::resolve(None, "weightlifting").as_str(), "weightlifting");
        assert_eq!(ExerciseType::resolve(Some(""), "cardio").as_str(), "cardio");
        assert_eq!(ExerciseType::resolve(Some("mobility"), "cardio").as_str(), "mobility");
        assert_eq!(ExerciseType::resolve(None, "").as_str(), DEFAULT_EXERCISE_TYPE);
    }

    #[test]
    fn labels() {
        let mut overrides = BTreeMap::new();
        assert_eq!(ExerciseType::new("weightlifting").label(&overrides), "Weightlifting");
        assert_eq!(ExerciseType::new("upper_body-push").label(&overrides), "Upper Body Push");
        overrides.insert("cardio".to_string(), "Conditioning".to_string());
        assert_eq!(ExerciseType::new("cardio").label(&overrides), "Conditioning");
    }

    #[test]
    fn blank_name_uses_fallback() {
        assert_eq!(ExerciseRecord::new("x", "  ", "").display_name(), FALLBACK_EXERCISE_NAME);
        assert_eq!(ExerciseRecord::new("x", "Row", "").display_name(), "Row");
    }
}
