use strum_macros::Display;

use super::loader::CandidateSet;
use crate::catalog::FALLBACK_EXERCISE_NAME;
use crate::normalize::NameNormalizer;

/// Shown under an empty All/Results section.
pub const NO_MATCHES_PLACEHOLDER: &str = "No matches. Try another keyword.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SectionKind {
    Recent,
    Logged,
    All,
    Results,
}

/// Row caps per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLimits {
    /// All section, empty query.
    pub browse: usize,
    pub logged: usize,
    /// Results section, non-empty query.
    pub search: usize,
}

impl Default for SectionLimits {
    fn default() -> Self {
        Self {
            browse: 40,
            logged: 40,
            search: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Position of the record in the candidate library.
    pub record_index: usize,
    pub exercise_id: String,
    pub name: String,
    pub equipment: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn title(&self) -> String {
        self.kind.to_string()
    }
}

/// Addresses one rendered row; the session resolves it back to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRef {
    pub section: SectionKind,
    pub row: usize,
}

/// Everything a container needs to paint the picker body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerView {
    pub status: String,
    pub sections: Vec<Section>,
    pub placeholder: Option<&'static str>,
}

impl PickerView {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn row(&self, row_ref: RowRef) -> Option<&Row> {
        self.section(row_ref.section)
            .and_then(|s| s.rows.get(row_ref.row))
    }

    /// All rows in display order, with their addresses.
    pub fn rows(&self) -> impl Iterator<Item = (RowRef, &Row)> + '_ {
        self.sections.iter().flat_map(|section| {
            section.rows.iter().enumerate().map(move |(row, r)| {
                (
                    RowRef {
                        section: section.kind,
                        row,
                    },
                    r,
                )
            })
        })
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

fn make_row(candidates: &CandidateSet, record_index: usize, selected_id: Option<&str>) -> Row {
    let record = &candidates.library()[record_index];
    Row {
        record_index,
        exercise_id: record.id.clone(),
        name: record.display_name().to_string(),
        equipment: record.equipment.clone(),
        active: selected_id == Some(record.id.as_str()),
    }
}

fn plural_results(count: usize) -> String {
    if count == 1 {
        format!("{count} result")
    } else {
        format!("{count} results")
    }
}

/// Builds the sections and status line for `query`. Pure: the same inputs
/// always give the same view.
pub fn build_view(
    candidates: &CandidateSet,
    query: &str,
    selected_id: Option<&str>,
    normalizer: &dyn NameNormalizer,
    limits: SectionLimits,
) -> PickerView {
    let searching = !query.trim().is_empty();
    let library = candidates.library();

    let filtered: Vec<usize> = if searching {
        let needle = normalizer.normalize(query);
        (0..library.len())
            .filter(|&i| candidates.folded_name(i).contains(needle.as_str()))
            .collect()
    } else {
        (0..library.len()).collect()
    };

    let status = if searching {
        plural_results(filtered.len())
    } else {
        let current = selected_id
            .and_then(|id| candidates.find(id))
            .map_or(FALLBACK_EXERCISE_NAME, |record| record.display_name());
        format!("Current: {current}")
    };

    let mut sections = Vec::new();

    if !searching {
        let recent: Vec<Row> = candidates
            .recent_ids()
            .iter()
            .filter_map(|id| candidates.position_of(id))
            .map(|i| make_row(candidates, i, selected_id))
            .collect();
        if !recent.is_empty() {
            sections.push(Section {
                kind: SectionKind::Recent,
                rows: recent,
            });
        }

        let logged: Vec<Row> = library
            .iter()
            .enumerate()
            .filter(|(_, record)| candidates.logged_ids().contains(&record.id))
            .take(limits.logged)
            .map(|(i, _)| make_row(candidates, i, selected_id))
            .collect();
        if !logged.is_empty() {
            sections.push(Section {
                kind: SectionKind::Logged,
                rows: logged,
            });
        }
    }

    let (kind, cap) = if searching {
        (SectionKind::Results, limits.search)
    } else {
        (SectionKind::All, limits.browse)
    };
    let rows: Vec<Row> = filtered
        .into_iter()
        .take(cap)
        .map(|i| make_row(candidates, i, selected_id))
        .collect();
    let placeholder = rows.is_empty().then_some(NO_MATCHES_PLACEHOLDER);
    sections.push(Section { kind, rows });

    PickerView {
        status,
        sections,
        placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ExerciseRecord, ExerciseType};
    use crate::normalize::FoldingNormalizer;
    use std::collections::HashSet;

    fn candidates(records: &[(&str, &str)], logged: &[&str], recent: &[&str]) -> CandidateSet {
        CandidateSet::new(
            ExerciseType::default(),
            records
                .iter()
                .map(|(id, name)| ExerciseRecord::new(*id, *name, ""))
                .collect(),
            logged.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            recent.iter().map(|s| s.to_string()).collect(),
            &FoldingNormalizer,
        )
    }

    fn names(view: &PickerView, kind: SectionKind) -> Vec<String> {
        view.section(kind)
            .map(|s| s.rows.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn whitespace_query_counts_as_browsing() {
        let c = candidates(&[("a", "Squat")], &[], &[]);
        let view = build_view(&c, "   ", None, &FoldingNormalizer, SectionLimits::default());
        assert_eq!(view.status, "Current: Exercise");
        assert!(view.section(SectionKind::All).is_some());
    }

    #[test]
    fn search_ignores_accents_and_case() {
        let c = candidates(&[("a", "Écarté Raise"), ("b", "Squat")], &[], &[]);
        let view = build_view(&c, "ECART", None, &FoldingNormalizer, SectionLimits::default());
        assert_eq!(names(&view, SectionKind::Results), vec!["Écarté Raise"]);
        assert_eq!(view.status, "1 result");
    }

    #[test]
    fn custom_limits_apply() {
        let c = candidates(
            &[("a", "A1"), ("b", "A2"), ("c", "A3")],
            &["a", "b", "c"],
            &[],
        );
        let limits = SectionLimits {
            browse: 2,
            logged: 1,
            search: 3,
        };
        let browse = build_view(&c, "", None, &FoldingNormalizer, limits);
        assert_eq!(names(&browse, SectionKind::All), vec!["A1", "A2"]);
        assert_eq!(names(&browse, SectionKind::Logged), vec!["A1"]);

        let search = build_view(&c, "a", None, &FoldingNormalizer, limits);
        assert_eq!(names(&search, SectionKind::Results).len(), 3);
        assert_eq!(search.status, "3 results");
    }

    #[test]
    fn rows_are_addressed_in_display_order() {
        let c = candidates(&[("a", "Bench Press"), ("b", "Squat")], &["a"], &["b"]);
        let view = build_view(&c, "", Some("b"), &FoldingNormalizer, SectionLimits::default());
        let refs: Vec<(SectionKind, usize, bool)> = view
            .rows()
            .map(|(r, row)| (r.section, r.row, row.active))
            .collect();
        assert_eq!(
            refs,
            vec![
                (SectionKind::Recent, 0, true),
                (SectionKind::Logged, 0, false),
                (SectionKind::All, 0, false),
                (SectionKind::All, 1, true),
            ]
        );
        assert_eq!(view.row_count(), 4);
    }
}
