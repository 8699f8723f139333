// src/lib.rs
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod catalog;
mod config;
pub mod db;
pub mod normalize;
pub mod picker;

// --- Expose public types ---
pub use catalog::{
    Capability, CatalogSource, ExerciseRecord, ExerciseType, LogSource, NoRecency,
    RecencyStore, SourceError, WorkoutLogEntry, DEFAULT_EXERCISE_TYPE, FALLBACK_EXERCISE_NAME,
};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, Limits, StandardColor, Theme,
};
pub use db::{get_db_path as get_db_path_util, DbError, NewWorkoutLog, SelectionTable};
pub use normalize::{FoldingNormalizer, NameNormalizer};
pub use picker::{
    Collaborators, CommitOutcome, Container, Delivery, DialogSize, DialogSpec, PickerOptions,
    PickerRequest, PickerSession, PickerView, RowRef, SectionKind, SectionLimits, SessionPhase,
};

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let conn = db::open_db(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        db::init_db(&conn).context("Failed to initialize database schema")?;

        Ok(Self {
            config,
            conn,
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if validation or saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        config::save(&self.config_path, &self.config)
    }

    /// Sets the type used when a picker is opened without one.
    /// # Errors
    /// Returns `anyhow::Error` if the type is blank or saving fails.
    pub fn set_default_exercise_type(&mut self, exercise_type: &str) -> Result<()> {
        let trimmed = exercise_type.trim();
        if trimmed.is_empty() {
            bail!("Default exercise type cannot be empty.");
        }
        self.config.default_exercise_type = trimmed.to_string();
        self.save_config().map_err(Into::into)
    }

    /// Sets how many recent selections the picker shows per type.
    /// # Errors
    /// - `ConfigError::InvalidRecentLimit` if `limit` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_recent_limit(&mut self, limit: u32) -> Result<(), ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidRecentLimit);
        }
        self.config.recent_limit = limit;
        self.save_config()
    }

    /// Resolves a possibly missing type against the configured default.
    pub fn resolve_type(&self, exercise_type: Option<&str>) -> ExerciseType {
        ExerciseType::resolve(exercise_type, &self.config.default_exercise_type)
    }

    pub fn type_label(&self, exercise_type: &ExerciseType) -> String {
        exercise_type.label(&self.config.type_labels)
    }

    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            default_type: self.config.default_exercise_type.clone(),
            limits: self.config.limits.into(),
            type_labels: self.config.type_labels.clone(),
        }
    }

    /// The selections table as seen by the picker.
    pub fn recency(&self) -> SelectionTable<'_> {
        SelectionTable {
            conn: &self.conn,
            limit: self.config.recent_limit,
        }
    }

    /// Opens a picker over this service's catalog, logs and selection history.
    /// `recency` is usually [`AppService::recency`]; it must outlive the session.
    pub fn open_picker<'a, C: Container>(
        &'a self,
        request: PickerRequest<'a>,
        recency: &'a dyn RecencyStore,
        container: C,
    ) -> PickerSession<'a, C> {
        let collaborators = Collaborators {
            catalog: &self.conn,
            logs: &self.conn,
            recency,
            normalizer: &FoldingNormalizer,
        };
        PickerSession::open(request, collaborators, &self.picker_options(), container)
    }

    /// Renders the picker once for `query` and closes it without selecting
    /// anything. Returns the last rendered view and the container.
    pub fn show_picker<C: Container>(
        &self,
        exercise_type: Option<&str>,
        current_id: Option<&str>,
        query: Option<&str>,
        container: C,
    ) -> (PickerView, C) {
        let recency = self.recency();
        let mut session =
            self.open_picker(PickerRequest::new(exercise_type, current_id), &recency, container);
        if let Some(q) = query {
            session.set_query(q);
        }
        let view = session.view().clone();
        session.close();
        (view, session.into_container())
    }

    /// Adds an exercise definition to the catalog.
    /// # Errors
    /// Returns `anyhow::Error` if the name is blank or insertion fails.
    pub fn add_exercise(
        &self,
        exercise_type: &ExerciseType,
        id: &str,
        name: &str,
        equipment: Option<&str>,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let record = ExerciseRecord::new(id.trim(), name, equipment.unwrap_or("").trim());
        db::add_exercise(&self.conn, exercise_type, &record)
            .with_context(|| format!("Failed to add exercise '{name}'"))
    }

    /// Exercises of one type, in catalog order.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError` variants.
    pub fn list_exercises(&self, exercise_type: &ExerciseType) -> Result<Vec<ExerciseRecord>> {
        db::exercises_by_type(&self.conn, exercise_type)
            .with_context(|| format!("Failed to list exercises of type '{exercise_type}'"))
    }

    /// Logs a workout entry.
    /// # Errors
    /// Returns `anyhow::Error` if the type or exercise id is blank or insertion fails.
    pub fn log_workout(&self, entry: &NewWorkoutLog) -> Result<i64> {
        if entry.exercise_type.trim().is_empty() {
            bail!("Workout type cannot be empty.");
        }
        if entry.exercise_id.trim().is_empty() {
            bail!("Workout exercise ID cannot be empty.");
        }
        db::add_workout(&self.conn, entry).context("Failed to log workout")
    }

    /// Most recently selected exercise ids for a type, newest first.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError` variants.
    pub fn recent_exercise_ids(&self, exercise_type: &ExerciseType) -> Result<Vec<String>> {
        db::recent_selection_ids(&self.conn, exercise_type, self.config.recent_limit)
            .context("Failed to read recent selections")
    }
}
