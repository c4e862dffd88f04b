//! The catalog-wide join: authoritative records and the successor index.
//!
//! The [`CatalogIndex`] knows nothing about the filesystem. It is built once,
//! after every course's requirement trees exist, because a course's
//! successors are only discovered while processing the courses that depend on
//! it.

use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use tracing::instrument;

use crate::domain::{CourseCode, CourseRecord, ParseMetrics};

/// Maps each course to the courses that list it as a prerequisite.
pub type SuccessorIndex = BTreeMap<CourseCode, Vec<CourseCode>>;

/// Builds the reverse-dependency index for a whole catalog.
///
/// For every record with a prerequisite tree, each leaf code that names a
/// course in the catalog gains the record's code as a successor. Lists are
/// sorted by code string and contain each successor once, however many
/// branches of the dependent's tree mention the prerequisite. Codes no record
/// depends on have no entry.
#[must_use]
pub fn build_successor_index(records: &[CourseRecord]) -> SuccessorIndex {
    let known: BTreeSet<&CourseCode> = records.iter().map(|record| &record.code).collect();

    let mut index = SuccessorIndex::new();
    for record in records {
        let Some(prereqs) = &record.prereqs else {
            continue;
        };
        for leaf in prereqs.leaves() {
            if known.contains(leaf) {
                index
                    .entry(leaf.clone())
                    .or_default()
                    .push(record.code.clone());
            }
        }
    }

    for successors in index.values_mut() {
        successors.sort();
        successors.dedup();
    }
    index
}

/// The finished catalog: one authoritative record per course code plus the
/// successor index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogIndex {
    /// Authoritative records keyed by code, with successors filled in.
    courses: BTreeMap<CourseCode, CourseRecord>,

    /// Successor lists keyed by prerequisite code.
    successors: SuccessorIndex,
}

impl CatalogIndex {
    /// Joins every record of a catalog run.
    ///
    /// `records` must be in the deterministic processing order (departments
    /// by code, listings in page order). When a code is listed by several
    /// departments, the copy carrying an anchor is authoritative; if none or
    /// several do, the first one seen wins. The other copies are left out of
    /// the index, but their prerequisite edges still count towards the
    /// successor index under the shared code.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    #[must_use]
    pub fn build(records: Vec<CourseRecord>, metrics: &mut ParseMetrics) -> Self {
        let successors = build_successor_index(&records);

        let mut courses: BTreeMap<CourseCode, CourseRecord> = BTreeMap::new();
        for record in records {
            match courses.entry(record.code.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
                Entry::Occupied(mut entry) => {
                    if !entry.get().has_anchor() && record.has_anchor() {
                        tracing::debug!(
                            "Using {} listing of {} over {}",
                            record.dept,
                            record.code,
                            entry.get().dept
                        );
                        entry.insert(record);
                    } else {
                        tracing::debug!(
                            "Skipping {} listing of {} in favour of {}",
                            record.dept,
                            record.code,
                            entry.get().dept
                        );
                    }
                }
            }
        }

        for (code, record) in &mut courses {
            if let Some(list) = successors.get(code) {
                record.successors.clone_from(list);
            }
        }

        metrics.with_prerequisites = courses.values().filter(|c| c.prereqs.is_some()).count();
        metrics.with_corequisites = courses.values().filter(|c| c.coreqs.is_some()).count();
        metrics.with_successors = successors.len();

        Self {
            courses,
            successors,
        }
    }

    /// Looks up the authoritative record for a code.
    #[must_use]
    pub fn get(&self, code: &CourseCode) -> Option<&CourseRecord> {
        self.courses.get(code)
    }

    /// All authoritative records, ordered by code.
    pub fn courses(&self) -> impl Iterator<Item = &CourseRecord> {
        self.courses.values()
    }

    /// The number of distinct courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// The courses that list `code` as a prerequisite.
    #[must_use]
    pub fn successors(&self, code: &CourseCode) -> &[CourseCode] {
        self.successors.get(code).map_or(&[], Vec::as_slice)
    }

    /// The whole successor index.
    #[must_use]
    pub const fn successor_index(&self) -> &SuccessorIndex {
        &self.successors
    }

    /// Prerequisite cycles: groups of courses that (transitively) require each
    /// other, and courses that require themselves.
    ///
    /// Each group is sorted, and the groups are sorted, for stable output.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<CourseCode>> {
        let mut graph: DiGraphMap<&CourseCode, ()> = DiGraphMap::new();
        for (prereq, successors) in &self.successors {
            for successor in successors {
                graph.add_edge(prereq, successor, ());
            }
        }

        let mut cycles = Vec::new();
        for component in tarjan_scc(&graph) {
            if component.len() > 1 {
                let mut codes: Vec<CourseCode> = component.into_iter().cloned().collect();
                codes.sort();
                cycles.push(codes);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                cycles.push(vec![node.clone()]);
            }
        }

        cycles.sort();
        cycles
    }
}
