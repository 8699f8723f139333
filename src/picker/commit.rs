use crate::catalog::{Capability, ExerciseRecord, ExerciseType, RecencyStore};

/// Caller callback receiving the committed exercise id.
pub type OnSelect<'a> = Box<dyn FnOnce(&str) -> anyhow::Result<()> + 'a>;

/// What happened to one side effect of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Done,
    Unsupported,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The record had no id; nothing was persisted or reported.
    Ignored,
    Committed {
        exercise_id: String,
        persisted: Delivery,
        notified: Delivery,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Persists a pick and reports it to the caller. Neither step can fail the commit.
pub struct SelectionCommitter<'a> {
    exercise_type: ExerciseType,
    recency: &'a dyn RecencyStore,
}

impl<'a> SelectionCommitter<'a> {
    pub fn new(exercise_type: ExerciseType, recency: &'a dyn RecencyStore) -> Self {
        Self {
            exercise_type,
            recency,
        }
    }

    /// Commits `record`. The callback is only taken out of `on_select` once the
    /// record passes the id guard, so an ignored pick leaves it in place.
    pub fn commit(
        &self,
        record: &ExerciseRecord,
        on_select: &mut Option<OnSelect<'_>>,
    ) -> CommitOutcome {
        let id = record.id.as_str();
        if id.is_empty() {
            tracing::debug!(name = %record.name, "ignoring pick of exercise without id");
            return CommitOutcome::Ignored;
        }

        let persisted = match self.recency.set_selected_exercise_id(&self.exercise_type, id) {
            Capability::Supported(Ok(())) => Delivery::Done,
            Capability::Supported(Err(e)) => {
                tracing::warn!(exercise_type = %self.exercise_type, exercise_id = id, error = %e, "failed to persist selection");
                Delivery::Failed(e.to_string())
            }
            Capability::Unsupported => Delivery::Unsupported,
        };

        let notified = match on_select.take() {
            Some(callback) => match callback(id) {
                Ok(()) => Delivery::Done,
                Err(e) => {
                    tracing::warn!(exercise_id = id, error = %e, "selection callback failed");
                    Delivery::Failed(e.to_string())
                }
            },
            None => Delivery::Unsupported,
        };

        tracing::info!(exercise_type = %self.exercise_type, exercise_id = id, "exercise selected");
        CommitOutcome::Committed {
            exercise_id: id.to_string(),
            persisted,
            notified,
        }
    }
}
