//! Finding the prerequisite and corequisite clauses in a course description.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ParseMetrics;

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<kind>Pre|Co)requisites?:").expect("valid regex"));

// A prerequisite clause runs from its first code (or "one of"/"two of") to a
// terminator or the next requisite label. A corequisite marker inside it ends the prerequisites and
// starts a corequisite clause.
static PREREQUISITES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[^.]*?(?:(?P<concurrent>concurrent)|(?P<clause>\(?(?:for )?(?:[A-Z]{3,}|SE)\s[0-9]+.*?|[Oo]ne of .*?|[Tt]wo of .*?)(?:\.|not|completed|credit|restrict|majors|(?P<corequisites>concurrent|corequisite|[A-Z]{2,}\s[0-9]+[A-Z]* (?:must|should) be taken)|\z))",
    )
    .expect("valid regex")
});

static COREQUISITES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[^.]*?(?P<clause>\(?(?:for )?(?:[A-Z]{3,}|SE)\s[0-9]+.*?|[Oo]ne of .*?|[Tt]wo of .*?)(?:\.|not|completed|credit|restrict|majors|\z)",
    )
    .expect("valid regex")
});

// Phrases that look like codes or conjunctions but are not requirements.
static FALSE_POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[Gg]rade|[Ss]core) of .*? or (?:better|higher)|[A-D][-\u{2013}+]? or (?:better|higher)|,? or equivalent|GPA [0-9]|ACT|MBA|\(?(?:for|prior)[^,;]*\)?",
    )
    .expect("valid regex")
});

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,}\s[0-9]+[A-Z]*").expect("valid regex"));

// Shorthand continuing a code: `-C`, `/8B`, `, 20B`, `, and C`, ` or 15`.
static CODE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-\u{2013}/]|, (?:and |or )?| (?:and|or) )(?:(?P<number>[0-9]+[A-Z]*)|(?P<letters>[A-Z]{1,2}))",
    )
    .expect("valid regex")
});

const RECOMMENDED: [&str; 2] = ["Recommended ", "recommended "];

/// The kind of requisite a label introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// `Prerequisite(s):`
    Prerequisite,
    /// `Corequisite(s):`, or a corequisite marker inside a prerequisite
    /// clause.
    Corequisite,
}

/// The isolated course text of a description's requirement clauses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IsolatedClauses {
    /// Text of the prerequisite clause, reduced to its course codes.
    pub prerequisites: Option<String>,
    /// Text of the corequisite clause, reduced to its course codes.
    pub corequisites: Option<String>,
}

/// Finds and isolates the prerequisite and corequisite clauses of a
/// description.
///
/// Labels are processed left to right and a later clause of the same kind
/// replaces an earlier one. Labels preceded by "Recommended" are ignored. A
/// label followed by no course codes counts as an empty requirement.
pub fn isolate_requirements(description: &str, metrics: &mut ParseMetrics) -> IsolatedClauses {
    let mut isolated = IsolatedClauses::default();
    for (kind, clause) in find_clauses(description, metrics) {
        let courses = isolate_courses(clause);
        if courses.is_none() {
            tracing::debug!("No courses in {kind:?} clause \"{clause}\"");
            metrics.empty_requirements += 1;
        }
        match kind {
            ClauseKind::Prerequisite => isolated.prerequisites = courses,
            ClauseKind::Corequisite => isolated.corequisites = courses,
        }
    }
    isolated
}

fn find_clauses<'a>(description: &'a str, metrics: &mut ParseMetrics) -> Vec<(ClauseKind, &'a str)> {
    let mut clauses = Vec::new();
    let mut start = 0;
    while let Some((kind, label_end)) = next_label(description, start) {
        start = label_end;
        let mut corequisites_follow = false;

        // A clause never runs past the next requisite label, recommended or not.
        let bound = LABEL
            .find_at(description, start)
            .map_or(description.len(), |label| label.start());
        let text = &description[..bound];

        if kind == ClauseKind::Prerequisite {
            let Some(captures) = PREREQUISITES.captures(&text[start..]) else {
                tracing::debug!("Prerequisite label without courses in \"{description}\"");
                metrics.empty_requirements += 1;
                start = bound;
                continue;
            };
            if let Some(marker) = captures.name("concurrent") {
                corequisites_follow = true;
                start += marker.start();
            } else {
                if let Some(clause) = captures.name("clause") {
                    tracing::debug!("PREREQS   : {}", clause.as_str());
                    clauses.push((ClauseKind::Prerequisite, clause.as_str()));
                }
                if let Some(marker) = captures.name("corequisites") {
                    corequisites_follow = true;
                    start += marker.start();
                } else {
                    start += captures.get(0).map_or(0, |m| m.end());
                }
            }
        }

        if kind == ClauseKind::Corequisite || corequisites_follow {
            let Some(captures) = COREQUISITES.captures(&text[start..]) else {
                tracing::debug!("Corequisite label without courses in \"{description}\"");
                metrics.empty_requirements += 1;
                start = bound;
                continue;
            };
            if let Some(clause) = captures.name("clause") {
                tracing::debug!("COREQS    : {}", clause.as_str());
                clauses.push((ClauseKind::Corequisite, clause.as_str()));
            }
            start += captures.get(0).map_or(0, |m| m.end());
        }
    }
    clauses
}

/// The next requisite label at or after `from` that is not a recommendation,
/// and the index just past it.
fn next_label(description: &str, mut from: usize) -> Option<(ClauseKind, usize)> {
    loop {
        let captures = LABEL.captures_at(description, from)?;
        let label = captures.get(0)?;
        from = label.end();

        let preceding = &description[..label.start()];
        if RECOMMENDED.iter().any(|word| preceding.ends_with(word)) {
            continue;
        }
        let kind = if &captures["kind"] == "Pre" {
            ClauseKind::Prerequisite
        } else {
            ClauseKind::Corequisite
        };
        return Some((kind, label.end()));
    }
}

/// Reduces a clause to the span holding its course codes.
///
/// False-positive phrases (grade thresholds, "or equivalent", test names,
/// `(for ...)` qualifiers) are removed, then the text is cut after the last
/// code and any shorthand continuing it. Returns `None` if no code is left.
#[must_use]
pub fn isolate_courses(clause: &str) -> Option<String> {
    let stripped = FALSE_POSITIVE.replace_all(clause, "");
    let end = last_course_end(&stripped)?;
    Some(stripped[..end].to_string())
}

fn last_course_end(text: &str) -> Option<usize> {
    let mut end = None;
    let mut from = 0;
    while let Some(code) = CODE.find_at(text, from) {
        end = Some(code.end());
        from = code.start() + text[code.start()..].chars().next().map_or(1, char::len_utf8);
    }
    let mut end = end?;

    while let Some(captures) = CODE_CONTINUATION.captures(&text[end..]) {
        if let Some(letters) = captures.name("letters") {
            let next = text[end + letters.end()..].chars().next();
            if next.is_some_and(|c| c.is_ascii_digit() || ('A'..='z').contains(&c)) {
                break;
            }
        }
        end += captures.get(0).map_or(0, |m| m.end());
    }

    if text[end..].starts_with(')') {
        end += 1;
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn isolate(description: &str) -> (IsolatedClauses, ParseMetrics) {
        let mut metrics = ParseMetrics::default();
        let isolated = isolate_requirements(description, &mut metrics);
        (isolated, metrics)
    }

    #[test]
    fn prerequisites_end_at_period() {
        let (isolated, _) = isolate(
            "Covers trees and graphs. Prerequisites: CSE 12 and (CSE 15L or CSE 30). Restricted to majors.",
        );
        assert_eq!(
            isolated.prerequisites.as_deref(),
            Some("CSE 12 and (CSE 15L or CSE 30)")
        );
        assert_eq!(isolated.corequisites, None);
    }

    #[test]
    fn shorthand_after_last_code_is_kept() {
        let (isolated, _) = isolate("Prerequisites: MATH 20A, 20B, and 20C.");
        assert_eq!(
            isolated.prerequisites.as_deref(),
            Some("MATH 20A, 20B, and 20C")
        );
    }

    #[test]
    fn one_of_clause() {
        let (isolated, _) = isolate("Prerequisites: one of CSE 21, CSE 101, or MATH 154.");
        assert_eq!(
            isolated.prerequisites.as_deref(),
            Some("one of CSE 21, CSE 101, or MATH 154")
        );
    }

    #[test]
    fn recommended_labels_are_ignored() {
        let (isolated, _) =
            isolate("Prerequisites: CSE 12. Recommended Corequisites: CSE 15L.");
        assert_eq!(isolated.prerequisites.as_deref(), Some("CSE 12"));
        assert_eq!(isolated.corequisites, None);
    }

    #[test]
    fn corequisite_label() {
        let (isolated, _) = isolate("Lab. Corequisites: CHEM 6A.");
        assert_eq!(isolated.prerequisites, None);
        assert_eq!(isolated.corequisites.as_deref(), Some("CHEM 6A"));
    }

    #[test]
    fn must_be_taken_starts_corequisites() {
        let (isolated, _) =
            isolate("Prerequisites: CSE 12; CSE 15L must be taken concurrently.");
        assert_eq!(isolated.prerequisites.as_deref(), Some("CSE 12"));
        assert_eq!(isolated.corequisites.as_deref(), Some("CSE 15L"));
    }

    #[test_case("Prerequisites: CSE 11; Corequisites: CSE 15L."; "semicolon")]
    #[test_case("Prerequisites: CSE 11, Corequisite: CSE 15L."; "comma")]
    #[test_case("Prerequisites: CSE 11 Corequisites: CSE 15L."; "no punctuation")]
    fn next_label_ends_clause(description: &str) {
        let (isolated, metrics) = isolate(description);
        assert_eq!(isolated.prerequisites.as_deref(), Some("CSE 11"));
        assert_eq!(isolated.corequisites.as_deref(), Some("CSE 15L"));
        assert_eq!(metrics.empty_requirements, 0);
    }

    #[test]
    fn corequisites_end_at_prerequisite_label() {
        let (isolated, _) = isolate("Corequisites: CHEM 6AL Prerequisites: CHEM 6A.");
        assert_eq!(isolated.corequisites.as_deref(), Some("CHEM 6AL"));
        assert_eq!(isolated.prerequisites.as_deref(), Some("CHEM 6A"));
    }

    #[test]
    fn recommended_label_still_ends_clause() {
        let (isolated, _) =
            isolate("Prerequisites: CSE 12; Recommended Corequisites: CSE 15L.");
        assert_eq!(isolated.prerequisites.as_deref(), Some("CSE 12"));
        assert_eq!(isolated.corequisites, None);
    }

    #[test]
    fn label_without_courses_before_next_label() {
        let (isolated, metrics) = isolate("Prerequisites: Corequisites: MATH 18.");
        assert_eq!(isolated.prerequisites, None);
        assert_eq!(isolated.corequisites.as_deref(), Some("MATH 18"));
        assert_eq!(metrics.empty_requirements, 1);
    }

    #[test]
    fn concurrent_enrollment_is_a_corequisite() {
        let (isolated, _) = isolate("Prerequisites: concurrent enrollment in MATH 18.");
        assert_eq!(isolated.prerequisites, None);
        assert_eq!(isolated.corequisites.as_deref(), Some("MATH 18"));
    }

    #[test]
    fn later_clause_replaces_earlier() {
        let (isolated, _) = isolate("Prerequisites: CSE 8A. Prerequisites: CSE 11.");
        assert_eq!(isolated.prerequisites.as_deref(), Some("CSE 11"));
    }

    #[test_case("Prerequisites: consent of instructor."; "consent")]
    #[test_case("Prerequisites: none."; "none")]
    fn labels_without_courses_are_empty(description: &str) {
        let (isolated, metrics) = isolate(description);
        assert_eq!(isolated, IsolatedClauses::default());
        assert_eq!(metrics.empty_requirements, 1);
    }

    #[test]
    fn no_label_no_clauses() {
        let (isolated, metrics) = isolate("An introduction to CSE 12 topics.");
        assert_eq!(isolated, IsolatedClauses::default());
        assert_eq!(metrics, ParseMetrics::default());
    }

    #[test_case("CSE 12 with a grade of B or better, or equivalent", "CSE 12"; "grade threshold")]
    #[test_case("CSE 21, CSE 100 (prior to fall 2023); or MATH 154", "CSE 21, CSE 100 ; or MATH 154"; "prior qualifier")]
    #[test_case("BILD 1-3 with a lab", "BILD 1-3"; "sequence")]
    #[test_case("CHEM 6A, B, or C", "CHEM 6A, B, or C"; "letters")]
    #[test_case("PHYS 2A/2B)", "PHYS 2A/2B)"; "closing paren")]
    #[test_case("CSE 12 or ABC", "CSE 12"; "word is not shorthand")]
    fn isolates_courses(clause: &str, expected: &str) {
        assert_eq!(isolate_courses(clause).as_deref(), Some(expected));
    }

    #[test]
    fn isolation_without_codes() {
        assert_eq!(isolate_courses("GPA 3.0 and MBA standing"), None);
    }
}
