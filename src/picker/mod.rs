//! Exercise picker session.
//!
//! A session loads its candidates once when opened, rebuilds the view on
//! every query change and closes after a successful commit or an explicit
//! close. The dialog itself is drawn by a [`Container`].

mod commit;
mod loader;
mod sections;

use std::collections::BTreeMap;

use crate::catalog::{CatalogSource, ExerciseRecord, ExerciseType, LogSource, RecencyStore};
use crate::normalize::NameNormalizer;

pub use commit::{CommitOutcome, Delivery, OnSelect, SelectionCommitter};
pub use loader::{load_candidates, CandidateSet, LoadReport, SourceStatus};
pub use sections::{
    build_view, PickerView, Row, RowRef, Section, SectionKind, SectionLimits,
    NO_MATCHES_PLACEHOLDER,
};

pub const INTRO_TEXT: &str = "Select an exercise for your Progress chart.";
pub const SEARCH_PLACEHOLDER: &str = "Search exercises…";
pub const CLOSE_LABEL: &str = "Close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    Small,
    Medium,
    Large,
}

/// How the container should present the picker dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSpec {
    pub title: String,
    pub intro: &'static str,
    pub search_placeholder: &'static str,
    pub close_label: &'static str,
    pub center: bool,
    pub size: DialogSize,
}

/// Presentation layer hosting the picker.
pub trait Container {
    fn open(&mut self, dialog: &DialogSpec);
    /// Repaints the body. Called after open and after every query change.
    fn render(&mut self, view: &PickerView);
    fn focus_search(&mut self);
    fn close(&mut self);
}

/// Loading happens inside [`PickerSession::open`], so the first observable
/// phase is `Interactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loaded,
    Interactive,
    Committed,
    Closed,
}

/// One-shot focus request queued after the first render.
#[derive(Debug, Default)]
pub struct DeferredFocus {
    pending: bool,
}

impl DeferredFocus {
    pub fn schedule(&mut self) {
        self.pending = true;
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns true exactly once per schedule.
    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// The data sources and collaborators a session reads from.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub catalog: &'a dyn CatalogSource,
    pub logs: &'a dyn LogSource,
    pub recency: &'a dyn RecencyStore,
    pub normalizer: &'a dyn NameNormalizer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    /// Used when the request has no type.
    pub default_type: String,
    pub limits: SectionLimits,
    pub type_labels: BTreeMap<String, String>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            default_type: crate::catalog::DEFAULT_EXERCISE_TYPE.to_string(),
            limits: SectionLimits::default(),
            type_labels: BTreeMap::new(),
        }
    }
}

/// Caller parameters for opening a picker.
#[derive(Default)]
pub struct PickerRequest<'a> {
    pub exercise_type: Option<String>,
    pub current_id: Option<String>,
    pub on_select: Option<OnSelect<'a>>,
}

impl<'a> PickerRequest<'a> {
    pub fn new(exercise_type: Option<&str>, current_id: Option<&str>) -> Self {
        Self {
            exercise_type: exercise_type.map(str::to_string),
            current_id: current_id.map(str::to_string),
            on_select: None,
        }
    }

    #[must_use]
    pub fn on_select(mut self, callback: impl FnOnce(&str) -> anyhow::Result<()> + 'a) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }
}

pub struct PickerSession<'a, C: Container> {
    container: C,
    collaborators: Collaborators<'a>,
    limits: SectionLimits,
    candidates: CandidateSet,
    report: LoadReport,
    dialog: DialogSpec,
    query: String,
    selected_id: Option<String>,
    on_select: Option<OnSelect<'a>>,
    view: PickerView,
    phase: SessionPhase,
    committed_id: Option<String>,
    focus: DeferredFocus,
}

impl<'a, C: Container> PickerSession<'a, C> {
    /// Loads candidates, opens the dialog, paints the first view and queues the
    /// search focus.
    pub fn open(
        request: PickerRequest<'a>,
        collaborators: Collaborators<'a>,
        options: &PickerOptions,
        mut container: C,
    ) -> Self {
        let exercise_type =
            ExerciseType::resolve(request.exercise_type.as_deref(), &options.default_type);
        // An empty current id means "nothing selected"
        let selected_id = request.current_id.filter(|id| !id.is_empty());

        let (candidates, report) = load_candidates(
            &exercise_type,
            collaborators.catalog,
            collaborators.logs,
            collaborators.recency,
            collaborators.normalizer,
        );

        let dialog = DialogSpec {
            title: format!("Pick {} exercise", exercise_type.label(&options.type_labels)),
            intro: INTRO_TEXT,
            search_placeholder: SEARCH_PLACEHOLDER,
            close_label: CLOSE_LABEL,
            center: true,
            size: DialogSize::Large,
        };
        container.open(&dialog);

        let mut session = Self {
            container,
            collaborators,
            limits: options.limits,
            candidates,
            report,
            dialog,
            query: String::new(),
            selected_id,
            on_select: request.on_select,
            view: PickerView::default(),
            phase: SessionPhase::Loaded,
            committed_id: None,
            focus: DeferredFocus::default(),
        };
        session.repaint();
        session.phase = SessionPhase::Interactive;
        session.focus.schedule();
        session
    }

    fn repaint(&mut self) {
        self.view = build_view(
            &self.candidates,
            &self.query,
            self.selected_id.as_deref(),
            self.collaborators.normalizer,
            self.limits,
        );
        self.container.render(&self.view);
    }

    /// Replaces the search text and repaints. The text is kept verbatim.
    pub fn set_query(&mut self, query: &str) {
        if self.phase != SessionPhase::Interactive {
            return;
        }
        self.query = query.to_string();
        self.repaint();
    }

    /// Runs deferred work queued by earlier events. Call once the current
    /// event has been fully handled.
    pub fn run_deferred(&mut self) {
        if self.focus.take() && self.phase == SessionPhase::Interactive {
            self.container.focus_search();
        }
    }

    /// Activates a rendered row. Unknown rows are ignored.
    pub fn activate(&mut self, row_ref: RowRef) -> CommitOutcome {
        let Some(index) = self.view.row(row_ref).map(|row| row.record_index) else {
            return CommitOutcome::Ignored;
        };
        let Some(record) = self.candidates.record(index).cloned() else {
            return CommitOutcome::Ignored;
        };
        self.commit(&record)
    }

    /// Commits `record` and closes the picker, unless the record has no id or
    /// the session is no longer interactive.
    pub fn commit(&mut self, record: &ExerciseRecord) -> CommitOutcome {
        if self.phase != SessionPhase::Interactive {
            return CommitOutcome::Ignored;
        }
        let committer =
            SelectionCommitter::new(self.candidates.exercise_type().clone(), self.collaborators.recency);
        let outcome = committer.commit(record, &mut self.on_select);
        if let CommitOutcome::Committed { exercise_id, .. } = &outcome {
            self.phase = SessionPhase::Committed;
            self.committed_id = Some(exercise_id.clone());
            self.close();
        }
        outcome
    }

    /// Closes the picker. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.focus.cancel();
        self.phase = SessionPhase::Closed;
        self.container.close();
        tracing::debug!(
            exercise_type = %self.candidates.exercise_type(),
            committed = self.committed_id.is_some(),
            "picker closed"
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != SessionPhase::Closed
    }

    pub fn view(&self) -> &PickerView {
        &self.view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The id committed in this session, if any.
    pub fn committed_id(&self) -> Option<&str> {
        self.committed_id.as_deref()
    }

    pub fn exercise_type(&self) -> &ExerciseType {
        self.candidates.exercise_type()
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn dialog(&self) -> &DialogSpec {
        &self.dialog
    }

    pub fn focus_pending(&self) -> bool {
        self.focus.is_pending()
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn into_container(self) -> C {
        self.container
    }
}
