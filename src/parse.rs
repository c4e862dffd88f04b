//! The text pipeline: from catalog strings to requirement trees.
//!
//! A description goes through four stages:
//!
//! 1. [`clause`] finds the prerequisite and corequisite clauses and cuts
//!    them down to their course codes.
//! 2. [`conjunctions`] rewrites list punctuation into `and`/`or`.
//! 3. [`codes`] completes shorthand codes and expands sequences.
//! 4. [`grammar`] parses the normalized string into a [`RequirementNode`],
//!    which is then consolidated.
//!
//! Title lines are handled separately by [`course_line`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::{ParseMetrics, RequirementNode};

/// Prerequisite and corequisite clause isolation.
pub mod clause;
pub use clause::{ClauseKind, IsolatedClauses, isolate_courses, isolate_requirements};

/// Shorthand code completion and sequence expansion.
pub mod codes;
pub use codes::{expand_code_sequences, fill_incomplete_codes};

/// Punctuation to conjunction rewriting.
pub mod conjunctions;
pub use conjunctions::normalize_conjunctions;

/// Title line parsing.
pub mod course_line;
pub use course_line::parse_course_line;

mod edits;
pub use edits::NormalizationEdit;

/// The requirement grammar.
pub mod grammar;
pub use grammar::ParseOutcome;

// Only full codes joined by `and`/`or`, optionally parenthesized.
static STANDARD_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?[A-Z]{2,}\s[0-9]+[A-Z]*(?: (?:and|or) \(?[A-Z]{2,}\s[0-9]+[A-Z]*\)?)*$")
        .expect("valid regex")
});

/// Rewrites an isolated clause into the form the grammar accepts: full codes,
/// `and`/`or`, `one`/`two` and parentheses.
///
/// Clauses already in that form are returned unchanged.
#[must_use]
pub fn normalize(clause: &str) -> String {
    if STANDARD_FORM.is_match(clause) {
        return clause.to_string();
    }
    let text = normalize_conjunctions(clause);
    let text = fill_incomplete_codes(&text);
    expand_code_sequences(&text)
}

/// The requirement trees of one course description.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Requirements {
    /// Courses that must be completed first.
    pub prerequisites: Option<RequirementNode>,
    /// Courses that must be taken at the same time (or earlier).
    pub corequisites: Option<RequirementNode>,
}

/// Runs the whole text pipeline over course descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequirementParser;

impl RequirementParser {
    /// Creates a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the prerequisite and corequisite trees from a description.
    ///
    /// Problems are never fatal: they are counted in `metrics`, and the
    /// affected tree is left out.
    pub fn parse_requirements(&self, description: &str, metrics: &mut ParseMetrics) -> Requirements {
        let clauses = isolate_requirements(description, metrics);
        Requirements {
            prerequisites: clauses
                .prerequisites
                .and_then(|clause| self.parse_clause(&clause, metrics)),
            corequisites: clauses
                .corequisites
                .and_then(|clause| self.parse_clause(&clause, metrics)),
        }
    }

    /// Normalizes and parses one isolated clause into a consolidated tree.
    #[allow(clippy::unused_self)]
    pub fn parse_clause(&self, clause: &str, metrics: &mut ParseMetrics) -> Option<RequirementNode> {
        tracing::debug!("ISOLATED  : {clause}");
        let normalized = normalize(clause);
        tracing::debug!("NORMALIZED: {normalized}");

        let outcome = grammar::parse(&normalized);
        if let Some(rest) = &outcome.unconsumed {
            tracing::warn!("Expression does not span entire string: \"{normalized}\", left \"{rest}\"");
            metrics.unmatched_trailing_expressions += 1;
        }
        let Some(tree) = outcome.tree else {
            tracing::warn!("Failed to parse expression tree in \"{normalized}\"");
            metrics.empty_requirements += 1;
            return None;
        };

        let tree = tree.consolidate();
        tracing::debug!("FINAL     : {tree}");
        Some(tree)
    }
}

/// Extracts the requirement trees from a description, discarding
/// diagnostics.
#[must_use]
pub fn extract_requirements(description: &str) -> Requirements {
    RequirementParser::new().parse_requirements(description, &mut ParseMetrics::default())
}
