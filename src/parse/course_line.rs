//! Title-line parsing: `CSE 100. Advanced Data Structures (4)`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::{CourseCode, CourseHeader, ParseMetrics, Subject, UNKNOWN_UNITS};

static STANDARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<subject>[A-Z]{2,}) (?P<number>[0-9]+[A-Z]*)[.: ]").expect("valid regex")
});

// `CSE/MATH 100.` or `CSE 8A/8B.` or `CSE 8A/MATH 8A.`
static CROSSLISTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<subject>[A-Z]{2,})(?:/[A-Z]{2,})* (?P<number>[0-9]+[A-Z]*)(?:/|[A-Z]{2,} [0-9]+[A-Z]*|[0-9]+[A-Z]*)*[.: ]",
    )
    .expect("valid regex")
});

static SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<subject>[A-Z]{2,}) (?P<number>[0-9]+[A-Z]*(?:[-\u{2013}][0-9A-Z]+)+)[.: ]")
        .expect("valid regex")
});

static LINGUISTICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Linguistics(?:/[A-Za-z ]+)? \((?P<subject>[A-Z]{2,})\) (?P<number>[0-9]+[A-Z]*(?:, [0-9]+[A-Z]*)*)[.: ]",
    )
    .expect("valid regex")
});

static UNITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?P<units>.+?)\)").expect("valid regex"));

/// Parses a catalog title line into the course's code, title and units.
///
/// The code forms are tried in order: a plain code, a crosslisting (only the
/// first code is kept), a sequence listing (the number keeps its range, as in
/// `100A-C`), and the linguistics form `Linguistics (LIGN) 101`. Units come
/// from the first parenthetical after the code and default to
/// [`UNKNOWN_UNITS`].
///
/// Returns `None` when no form matches; the line should be skipped.
pub fn parse_course_line(line: &str, metrics: &mut ParseMetrics) -> Option<CourseHeader> {
    let line = line.trim();
    let (captures, number) = match_code(line, metrics)?;

    let code = Subject::new(&captures["subject"])
        .map_err(Into::into)
        .and_then(|subject| CourseCode::new(&subject, number));
    let code = match code {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Failed to match course code in \"{line}\": {e}");
            metrics.code_match_failures += 1;
            return None;
        }
    };

    let title_start = captures.get(0).map_or(0, |m| m.end());
    let (units, title_end) = match UNITS.captures_at(line, title_start) {
        Some(units) => (
            units["units"].to_string(),
            units.get(0).map_or(line.len(), |m| m.start()),
        ),
        None => {
            tracing::warn!("Missing units in \"{line}\"");
            metrics.missing_units += 1;
            (UNKNOWN_UNITS.to_string(), line.len())
        }
    };

    Some(CourseHeader {
        code,
        title: line[title_start..title_end].trim().to_string(),
        units,
    })
}

fn match_code<'a>(line: &'a str, metrics: &mut ParseMetrics) -> Option<(Captures<'a>, &'a str)> {
    if let Some(captures) = STANDARD.captures(line) {
        let number = captures.name("number")?.as_str();
        return Some((captures, number));
    }
    if let Some(captures) = CROSSLISTED.captures(line) {
        tracing::warn!("Ignored crosslisting(s) in \"{line}\"");
        metrics.ignored_crosslistings += 1;
        let number = captures.name("number")?.as_str();
        return Some((captures, number));
    }
    if let Some(captures) = SEQUENCE.captures(line) {
        tracing::info!("Found sequence listing in \"{line}\"");
        metrics.sequence_listings += 1;
        let number = captures.name("number")?.as_str();
        return Some((captures, number));
    }
    if let Some(captures) = LINGUISTICS.captures(line) {
        let numbers = captures.name("number")?.as_str();
        let (first, rest) = numbers.split_once(',').unwrap_or((numbers, ""));
        if !rest.is_empty() {
            tracing::warn!("Ignored crosslisting(s) in \"{line}\"");
            metrics.ignored_crosslistings += 1;
        }
        return Some((captures, first));
    }

    tracing::error!("Failed to match course code in \"{line}\"");
    metrics.code_match_failures += 1;
    None
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn parse(line: &str) -> (Option<CourseHeader>, ParseMetrics) {
        let mut metrics = ParseMetrics::default();
        let header = parse_course_line(line, &mut metrics);
        (header, metrics)
    }

    fn parts(header: &CourseHeader) -> (&str, &str, &str, &str) {
        (
            header.subject(),
            header.number(),
            header.title.as_str(),
            header.units.as_str(),
        )
    }

    #[test]
    fn standard_line() {
        let (header, metrics) = parse("CSE 100. Advanced Data Structures (4)");
        assert_eq!(
            parts(&header.unwrap()),
            ("CSE", "100", "Advanced Data Structures", "4")
        );
        assert_eq!(metrics, ParseMetrics::default());
    }

    #[test]
    fn crosslisted_numbers_keep_the_first() {
        let (header, metrics) = parse("CSE 8A/8B. Intro (4)");
        assert_eq!(parts(&header.unwrap()), ("CSE", "8A", "Intro", "4"));
        assert_eq!(metrics.ignored_crosslistings, 1);
    }

    #[test_case("COGS/PSYC 14B. Statistics (4)", "COGS", "14B"; "shared number")]
    #[test_case("CSE 8A/MATH 8A. Intro (4)", "CSE", "8A"; "full second code")]
    fn crosslistings(line: &str, subject: &str, number: &str) {
        let (header, metrics) = parse(line);
        let header = header.unwrap();
        assert_eq!((header.subject(), header.number()), (subject, number));
        assert_eq!(metrics.ignored_crosslistings, 1);
    }

    #[test]
    fn sequence_keeps_range() {
        let (header, metrics) = parse("CSE 100A\u{2013}C. Sequence (4-4-4)");
        let header = header.unwrap();
        assert_eq!(header.number(), "100A\u{2013}C");
        assert_eq!(header.units, "4-4-4");
        assert_eq!(metrics.sequence_listings, 1);
        assert_eq!(metrics.ignored_crosslistings, 0);
    }

    #[test]
    fn linguistics_uses_first_number() {
        let (header, metrics) = parse("Linguistics/Spanish (LISP) 1A, 1AX. Beginning Spanish (2.5)");
        assert_eq!(
            parts(&header.unwrap()),
            ("LISP", "1A", "Beginning Spanish", "2.5")
        );
        assert_eq!(metrics.ignored_crosslistings, 1);
    }

    #[test]
    fn missing_units() {
        let (header, metrics) = parse("  MATH 20A: Calculus for Science and Engineering  ");
        let header = header.unwrap();
        assert_eq!(header.title, "Calculus for Science and Engineering");
        assert_eq!(header.units, UNKNOWN_UNITS);
        assert_eq!(metrics.missing_units, 1);
    }

    #[test_case("Advanced Data Structures (4)"; "no code")]
    #[test_case("cse 100. Lowercase (4)"; "lowercase subject")]
    #[test_case("CSE100. No space (4)"; "no space")]
    fn unmatched_lines_are_counted(line: &str) {
        let (header, metrics) = parse(line);
        assert!(header.is_none());
        assert_eq!(metrics.code_match_failures, 1);
    }
}
