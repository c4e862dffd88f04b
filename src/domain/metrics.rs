//! Counters for the non-fatal problems met while parsing a catalog.

use std::{fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};

/// An explicit accumulator threaded through the pipeline.
///
/// Each parsing task owns one; results are merged with `+=` once the tasks
/// finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetrics {
    /// Departments processed.
    pub departments: usize,
    /// Title lines seen.
    pub courses: usize,
    /// Title lines with no recognizable course code.
    pub code_match_failures: usize,
    /// Crosslisted codes dropped in favour of the first one.
    pub ignored_crosslistings: usize,
    /// Title lines listing a sequence such as `100A-C`.
    pub sequence_listings: usize,
    /// Title lines with no unit count.
    pub missing_units: usize,
    /// Listings without a page anchor.
    pub missing_anchors: usize,
    /// Listings without a description.
    pub missing_descriptions: usize,
    /// Requirement strings the grammar did not fully consume.
    pub unmatched_trailing_expressions: usize,
    /// Requisite labels with no course codes after them.
    pub empty_requirements: usize,
    /// Courses with a prerequisite tree.
    pub with_prerequisites: usize,
    /// Courses with a corequisite tree.
    pub with_corequisites: usize,
    /// Courses that are a prerequisite of at least one other course.
    pub with_successors: usize,
}

impl AddAssign for ParseMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.departments += rhs.departments;
        self.courses += rhs.courses;
        self.code_match_failures += rhs.code_match_failures;
        self.ignored_crosslistings += rhs.ignored_crosslistings;
        self.sequence_listings += rhs.sequence_listings;
        self.missing_units += rhs.missing_units;
        self.missing_anchors += rhs.missing_anchors;
        self.missing_descriptions += rhs.missing_descriptions;
        self.unmatched_trailing_expressions += rhs.unmatched_trailing_expressions;
        self.empty_requirements += rhs.empty_requirements;
        self.with_prerequisites += rhs.with_prerequisites;
        self.with_corequisites += rhs.with_corequisites;
        self.with_successors += rhs.with_successors;
    }
}

impl fmt::Display for ParseMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} departments, {} courses.",
            self.departments, self.courses
        )?;
        writeln!(
            f,
            "{} courses were crosslisted (instances besides the first were skipped).",
            self.ignored_crosslistings
        )?;
        writeln!(f, "{} sequence listings.", self.sequence_listings)?;
        writeln!(
            f,
            "Failed to parse course code {} times.",
            self.code_match_failures
        )?;
        writeln!(f, "Unit count was missing {} times.", self.missing_units)?;
        writeln!(f, "Anchor was missing {} times.", self.missing_anchors)?;
        writeln!(
            f,
            "Description was missing {} times.",
            self.missing_descriptions
        )?;
        writeln!(
            f,
            "{} requirement strings were only partially parsed, {} were empty.",
            self.unmatched_trailing_expressions, self.empty_requirements
        )?;
        write!(
            f,
            "{} courses have prerequisites, {} have corequisites, {} lead to other courses.",
            self.with_prerequisites, self.with_corequisites, self.with_successors
        )
    }
}
