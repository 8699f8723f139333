use std::collections::HashSet;

use crate::catalog::{
    Capability, CatalogSource, ExerciseRecord, ExerciseType, LogSource, RecencyStore,
};
use crate::normalize::NameNormalizer;

/// How one input of the loader fared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceStatus {
    #[default]
    Loaded,
    Unsupported,
    Failed(String),
}

impl SourceStatus {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Loaded)
    }
}

/// Per-source outcome of a load. A degraded source contributed an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub catalog: SourceStatus,
    pub logs: SourceStatus,
    pub recency: SourceStatus,
}

/// Candidates for one picker session. Built once at open, never mutated.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    exercise_type: ExerciseType,
    library: Vec<ExerciseRecord>,
    // Parallel to `library`
    folded_names: Vec<String>,
    logged_ids: HashSet<String>,
    recent_ids: Vec<String>,
}

impl CandidateSet {
    /// Builds a candidate set from already-fetched data.
    /// `catalog` is sorted by folded name; ties keep their catalog order.
    pub fn new(
        exercise_type: ExerciseType,
        catalog: Vec<ExerciseRecord>,
        logged_ids: HashSet<String>,
        recent_ids: Vec<String>,
        normalizer: &dyn NameNormalizer,
    ) -> Self {
        let mut keyed: Vec<(String, ExerciseRecord)> = catalog
            .into_iter()
            .map(|record| (normalizer.normalize(&record.name), record))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0)); // Stable

        let (folded_names, library): (Vec<String>, Vec<ExerciseRecord>) =
            keyed.into_iter().unzip();
        Self {
            exercise_type,
            library,
            folded_names,
            logged_ids,
            recent_ids,
        }
    }

    pub fn exercise_type(&self) -> &ExerciseType {
        &self.exercise_type
    }

    pub fn library(&self) -> &[ExerciseRecord] {
        &self.library
    }

    pub fn logged_ids(&self) -> &HashSet<String> {
        &self.logged_ids
    }

    pub fn recent_ids(&self) -> &[String] {
        &self.recent_ids
    }

    pub(crate) fn folded_name(&self, index: usize) -> &str {
        &self.folded_names[index]
    }

    /// Library position of the first record with `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.library.iter().position(|record| record.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&ExerciseRecord> {
        self.position_of(id).map(|index| &self.library[index])
    }

    pub fn record(&self, index: usize) -> Option<&ExerciseRecord> {
        self.library.get(index)
    }
}

/// Gathers a `CandidateSet` from injected sources. Never fails: every source
/// that is missing or errors contributes an empty collection and is noted in the report.
pub fn load_candidates(
    exercise_type: &ExerciseType,
    catalog: &dyn CatalogSource,
    logs: &dyn LogSource,
    recency: &dyn RecencyStore,
    normalizer: &dyn NameNormalizer,
) -> (CandidateSet, LoadReport) {
    let mut report = LoadReport::default();

    let library = match catalog.exercises_by_type(exercise_type) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(%exercise_type, error = %e, "exercise catalog unavailable, using empty library");
            report.catalog = SourceStatus::Failed(e.to_string());
            Vec::new()
        }
    };

    let logged_ids = match logs.workout_logs() {
        Ok(entries) => entries
            .into_iter()
            .filter(|entry| entry.exercise_type.as_deref() == Some(exercise_type.as_str()))
            .filter_map(|entry| entry.exercise_id)
            .filter(|id| !id.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!(%exercise_type, error = %e, "workout logs unavailable, nothing counts as logged");
            report.logs = SourceStatus::Failed(e.to_string());
            HashSet::new()
        }
    };

    let recent_ids = match recency.recent_exercise_ids(exercise_type) {
        Capability::Supported(Ok(ids)) => ids,
        Capability::Supported(Err(e)) => {
            tracing::warn!(%exercise_type, error = %e, "recent exercise ids unavailable");
            report.recency = SourceStatus::Failed(e.to_string());
            Vec::new()
        }
        Capability::Unsupported => {
            report.recency = SourceStatus::Unsupported;
            Vec::new()
        }
    };

    tracing::debug!(
        %exercise_type,
        library = library.len(),
        logged = logged_ids.len(),
        recent = recent_ids.len(),
        "loaded picker candidates"
    );

    let candidates = CandidateSet::new(
        exercise_type.clone(),
        library,
        logged_ids,
        recent_ids,
        normalizer,
    );
    (candidates, report)
}
