// src/db.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{
    Capability, CatalogSource, ExerciseRecord, ExerciseType, LogSource, RecencyStore,
    SourceError, WorkoutLogEntry,
};

// Custom Error type for DB operations
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Exercise ID must not be empty")]
    EmptyExerciseId,
    #[error("Exercise with ID '{0}' already exists")]
    DuplicateExercise(String),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
}

const DB_FILE_NAME: &str = "picker.sqlite";
const APP_DATA_DIR: &str = "exercise-picker";

/// Gets the path to the SQLite database file within the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, DbError> {
    Connection::open(path).map_err(DbError::Connection)
}

/// Initializes the database tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS exercises (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,              -- Exact, case-sensitive category tag
            equipment TEXT NOT NULL DEFAULT ''
        );
        CREATE INDEX IF NOT EXISTS idx_exercises_type ON exercises(type);

        CREATE TABLE IF NOT EXISTS workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,         -- RFC3339
            type TEXT,                       -- NULL/blank entries are skipped by the picker
            exercise_id TEXT,
            sets INTEGER,
            reps INTEGER,
            weight REAL,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS progress_selections (
            type TEXT NOT NULL,
            exercise_id TEXT NOT NULL,
            selected_at TEXT NOT NULL,       -- RFC3339
            selected_seq INTEGER NOT NULL,   -- Monotonic, newest is largest
            PRIMARY KEY (type, exercise_id)
        );",
    )
    .map_err(DbError::Connection)
}

/// Adds an exercise definition. Ids are unique across all types.
pub fn add_exercise(
    conn: &Connection,
    exercise_type: &ExerciseType,
    record: &ExerciseRecord,
) -> Result<(), DbError> {
    if record.id.trim().is_empty() {
        return Err(DbError::EmptyExerciseId);
    }
    conn.execute(
        "INSERT INTO exercises (id, name, type, equipment) VALUES (?1, ?2, ?3, ?4)",
        params![record.id, record.name, exercise_type.as_str(), record.equipment],
    )
    .map_err(|e| {
        if let rusqlite::Error::SqliteFailure(ref err, _) = e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                return DbError::DuplicateExercise(record.id.clone());
            }
        }
        DbError::InsertFailed(e)
    })?;
    Ok(())
}

fn map_row_to_record(row: &Row) -> Result<ExerciseRecord, rusqlite::Error> {
    Ok(ExerciseRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        equipment: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

/// Exercise definitions of one type, in insertion (catalog) order.
pub fn exercises_by_type(
    conn: &Connection,
    exercise_type: &ExerciseType,
) -> Result<Vec<ExerciseRecord>, DbError> {
    let mut stmt = conn
        .prepare("SELECT id, name, equipment FROM exercises WHERE type = ?1 ORDER BY rowid")
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(params![exercise_type.as_str()], map_row_to_record)
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkoutLog {
    pub timestamp: Option<DateTime<Utc>>, // Defaults to now
    pub exercise_type: String,
    pub exercise_id: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Adds a workout log entry. Returns its row id.
pub fn add_workout(conn: &Connection, entry: &NewWorkoutLog) -> Result<i64, DbError> {
    let timestamp = entry.timestamp.unwrap_or_else(Utc::now).to_rfc3339();
    conn.execute(
        "INSERT INTO workouts (timestamp, type, exercise_id, sets, reps, weight, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            timestamp,
            entry.exercise_type,
            entry.exercise_id,
            entry.sets,
            entry.reps,
            entry.weight,
            entry.notes
        ],
    )
    .map_err(DbError::InsertFailed)?;
    Ok(conn.last_insert_rowid())
}

/// All workout log entries, oldest first. Only type and exercise id are read.
pub fn list_workout_logs(conn: &Connection) -> Result<Vec<WorkoutLogEntry>, DbError> {
    let mut stmt = conn
        .prepare("SELECT type, exercise_id FROM workouts ORDER BY timestamp ASC, id ASC")
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(WorkoutLogEntry {
                exercise_type: row.get(0)?,
                exercise_id: row.get(1)?,
            })
        })
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

/// Marks `exercise_id` as the newest selection for `exercise_type`.
pub fn record_selection(
    conn: &Connection,
    exercise_type: &ExerciseType,
    exercise_id: &str,
) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO progress_selections (type, exercise_id, selected_at, selected_seq)
         VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(selected_seq), 0) + 1 FROM progress_selections))
         ON CONFLICT(type, exercise_id) DO UPDATE SET
            selected_at = excluded.selected_at,
            selected_seq = excluded.selected_seq",
        params![exercise_type.as_str(), exercise_id, Utc::now().to_rfc3339()],
    )
    .map_err(DbError::UpdateFailed)?;
    Ok(())
}

/// Selected exercise ids for a type, newest first.
pub fn recent_selection_ids(
    conn: &Connection,
    exercise_type: &ExerciseType,
    limit: u32,
) -> Result<Vec<String>, DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT exercise_id FROM progress_selections
             WHERE type = ?1
             ORDER BY selected_seq DESC
             LIMIT ?2",
        )
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(params![exercise_type.as_str(), limit], |row| row.get(0))
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<String>, _>>()
        .map_err(DbError::QueryFailed)
}

impl CatalogSource for Connection {
    fn exercises_by_type(
        &self,
        exercise_type: &ExerciseType,
    ) -> Result<Vec<ExerciseRecord>, SourceError> {
        exercises_by_type(self, exercise_type).map_err(Into::into)
    }
}

impl LogSource for Connection {
    fn workout_logs(&self) -> Result<Vec<WorkoutLogEntry>, SourceError> {
        list_workout_logs(self).map_err(Into::into)
    }
}

/// The `progress_selections` table seen as a recency collaborator.
#[derive(Debug, Clone, Copy)]
pub struct SelectionTable<'a> {
    pub conn: &'a Connection,
    pub limit: u32,
}

impl RecencyStore for SelectionTable<'_> {
    fn recent_exercise_ids(
        &self,
        exercise_type: &ExerciseType,
    ) -> Capability<Result<Vec<String>, SourceError>> {
        Capability::Supported(
            recent_selection_ids(self.conn, exercise_type, self.limit).map_err(Into::into),
        )
    }

    fn set_selected_exercise_id(
        &self,
        exercise_type: &ExerciseType,
        exercise_id: &str,
    ) -> Capability<Result<(), SourceError>> {
        Capability::Supported(
            record_selection(self.conn, exercise_type, exercise_id).map_err(Into::into),
        )
    }
}
