//! Recursive-descent parser for normalized requirement strings.
//!
//! ```text
//! Expr   := Term ('and' Term)*
//! Term   := Factor ('or' Factor)*
//! Factor := '(' Expr ')'
//!         | CODE
//!         | ('one' | 'two') CODE+
//! ```
//!
//! Each production returns the node it built, if any, and the index where it
//! stopped. A factor facing a terminator (`and`, `or`, `)` or the end of the
//! text) builds nothing and consumes nothing; its caller simply has one child
//! fewer. Leftover text between tokens is skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{GroupKind, RequirementNode};

static EXPR_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\band\b|\)").expect("valid regex"));

static TERM_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bor\b|\band\b|\)").expect("valid regex"));

static FACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<code>[A-Z]{2,}\s[0-9]+[A-Z]*)|(?P<paren>\()|(?P<one>\bone\b)|(?P<two>\btwo\b)|(?P<end>\bor\b|\band\b|\))",
    )
    .expect("valid regex")
});

/// The result of parsing a normalized requirement string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The tree, if the string held any course codes.
    pub tree: Option<RequirementNode>,
    /// Text after the point where parsing stopped, if it stopped early.
    ///
    /// The tree is still usable; it covers everything before this text.
    pub unconsumed: Option<String>,
}

/// Parses a normalized requirement string into an (unconsolidated) tree.
#[must_use]
pub fn parse(text: &str) -> ParseOutcome {
    let parser = Parser { text };
    let (tree, end) = parser.expr(0);
    let rest = text[end.min(text.len())..].trim();
    ParseOutcome {
        tree,
        unconsumed: (!rest.is_empty()).then(|| rest.to_string()),
    }
}

type Production = (Option<RequirementNode>, usize);

struct Parser<'a> {
    text: &'a str,
}

impl Parser<'_> {
    fn expr(&self, start: usize) -> Production {
        let mut children = Vec::new();
        let mut i = start;
        while i < self.text.len() {
            let (child, next) = self.term(i);
            children.extend(child);
            i = next;

            let Some(separator) = EXPR_SEPARATOR.find_at(self.text, i) else {
                break;
            };
            if separator.as_str() == ")" {
                i = separator.start();
                break;
            }
            i = separator.end();
        }
        (RequirementNode::group(GroupKind::All, children), i)
    }

    fn term(&self, start: usize) -> Production {
        let mut children = Vec::new();
        let mut i = start;
        while i < self.text.len() {
            let (child, next) = self.factor(i);
            children.extend(child);
            i = next;

            let Some(separator) = TERM_SEPARATOR.find_at(self.text, i) else {
                break;
            };
            if separator.as_str() != "or" {
                i = separator.start();
                break;
            }
            i = separator.end();
        }
        (RequirementNode::group(GroupKind::One, children), i)
    }

    fn factor(&self, start: usize) -> Production {
        let Some(captures) = FACTOR.captures_at(self.text, start) else {
            return (None, start);
        };
        if captures.name("end").is_some() {
            return (None, start);
        }
        let Some(token) = captures.get(0) else {
            return (None, start);
        };
        let i = token.end();

        if let Some(code) = captures.name("code") {
            let leaf = code.as_str().parse().ok().map(RequirementNode::Leaf);
            return (leaf, i);
        }
        if captures.name("paren").is_some() {
            let (child, end) = self.expr(i);
            // a missing `)` closes at the end of the text
            let close = self.text[end..]
                .find(')')
                .map_or(self.text.len(), |offset| end + offset + 1);
            return (child, close);
        }
        let kind = if captures.name("two").is_some() {
            GroupKind::Two
        } else {
            GroupKind::One
        };
        self.selection(kind, i)
    }

    /// "one of"/"two of" shorthand: every code up to the end of the enclosing
    /// parenthesized scope, with no sub-expressions.
    fn selection(&self, kind: GroupKind, start: usize) -> Production {
        let mut codes = Vec::new();
        let mut depth = 0_usize;
        let mut i = start;
        while let Some(captures) = FACTOR.captures_at(self.text, i) {
            let Some(token) = captures.get(0) else {
                break;
            };
            if let Some(code) = captures.name("code") {
                codes.extend(code.as_str().parse().ok().map(RequirementNode::Leaf));
            } else if captures.name("paren").is_some() {
                depth += 1;
            } else if token.as_str() == ")" {
                if depth == 0 {
                    i = token.start();
                    break;
                }
                depth -= 1;
            }
            i = token.end();
        }
        (RequirementNode::group(kind, codes), i)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn leaf(code: &str) -> RequirementNode {
        RequirementNode::Leaf(code.parse().unwrap())
    }

    fn group(kind: GroupKind, children: Vec<RequirementNode>) -> RequirementNode {
        RequirementNode::Group { kind, children }
    }

    fn tree(text: &str) -> RequirementNode {
        let outcome = parse(text);
        assert_eq!(outcome.unconsumed, None, "parsing {text:?}");
        outcome.tree.unwrap().consolidate()
    }

    #[test]
    fn single_code() {
        assert_eq!(tree("CSE 12"), leaf("CSE 12"));
    }

    #[test]
    fn parenthesized_alternatives() {
        assert_eq!(
            tree("CSE 12 and (CSE 15L or CSE 30)"),
            group(
                GroupKind::All,
                vec![
                    leaf("CSE 12"),
                    group(GroupKind::One, vec![leaf("CSE 15L"), leaf("CSE 30")])
                ]
            )
        );
    }

    #[test]
    fn or_binds_tighter_than_and() {
        assert_eq!(
            tree("CSE 12 or CSE 15L and CSE 30"),
            group(
                GroupKind::All,
                vec![
                    group(GroupKind::One, vec![leaf("CSE 12"), leaf("CSE 15L")]),
                    leaf("CSE 30")
                ]
            )
        );
    }

    #[test]
    fn one_of_shorthand() {
        assert_eq!(
            tree("one of CSE 21 or CSE 101 or MATH 154"),
            group(
                GroupKind::One,
                vec![leaf("CSE 21"), leaf("CSE 101"), leaf("MATH 154")]
            )
        );
    }

    #[test]
    fn two_of_shorthand() {
        assert_eq!(
            tree("two of the following: CHEM 6A and CHEM 6B and CHEM 6C"),
            group(
                GroupKind::Two,
                vec![leaf("CHEM 6A"), leaf("CHEM 6B"), leaf("CHEM 6C")]
            )
        );
    }

    #[test]
    fn selection_stops_at_its_scope() {
        assert_eq!(
            tree("MATH 18 and (one of CSE 21 or (CSE 101) or MATH 154)"),
            group(
                GroupKind::All,
                vec![
                    leaf("MATH 18"),
                    group(
                        GroupKind::One,
                        vec![leaf("CSE 21"), leaf("CSE 101"), leaf("MATH 154")]
                    )
                ]
            )
        );
    }

    #[test]
    fn dangling_conjunctions_contribute_nothing() {
        assert_eq!(
            tree("and CSE 12 or"),
            leaf("CSE 12")
        );
    }

    #[test]
    fn missing_close_paren_closes_at_end() {
        assert_eq!(
            tree("(CSE 12 or CSE 30"),
            group(GroupKind::One, vec![leaf("CSE 12"), leaf("CSE 30")])
        );
    }

    #[test]
    fn stray_close_paren_keeps_partial_tree() {
        let outcome = parse("CSE 12) and CSE 30");
        assert_eq!(outcome.tree, Some(leaf("CSE 12")));
        assert_eq!(outcome.unconsumed.as_deref(), Some(") and CSE 30"));
    }

    #[test_case(""; "empty")]
    #[test_case("consent of instructor"; "no codes")]
    fn no_codes_no_tree(text: &str) {
        assert_eq!(parse(text).tree, None);
    }

    #[test_case("CSE 12 and CSE 15L and (CSE 30 or ECE 30)"; "mixed")]
    #[test_case("((CSE 12))"; "redundant parens")]
    #[test_case("CSE 12 or (CSE 15L and (CSE 30 or CSE 21)) or MATH 18"; "deep nesting")]
    #[test_case("(BILD 1 and BILD 2) or (CHEM 6A and (CHEM 6B or CHEM 6BH))"; "alternatives of conjunctions")]
    fn leaves_match_input_codes_and_rendering_round_trips(text: &str) {
        let parsed = tree(text);

        let mut leaves: Vec<String> = parsed.leaves().iter().map(ToString::to_string).collect();
        leaves.sort();
        let mut expected: Vec<String> = FACTOR
            .captures_iter(text)
            .filter_map(|c| c.name("code").map(|m| m.as_str().to_string()))
            .collect();
        expected.sort();
        assert_eq!(leaves, expected);

        let reparsed = tree(&parsed.to_string());
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn two_of_round_trips_inside_a_group() {
        let original = group(
            GroupKind::All,
            vec![
                leaf("MATH 18"),
                group(GroupKind::Two, vec![leaf("CHEM 6A"), leaf("CHEM 6B"), leaf("CHEM 6C")]),
            ],
        );
        assert_eq!(tree(&original.to_string()), original);
    }
}
