//! Rewrites list punctuation into explicit `and`/`or` conjunctions.
//!
//! Catalog text writes boolean structure with punctuation: `A, B, and C`,
//! `A/B`, `A, B; C`, `(A, B)`. After this pass the string holds no commas,
//! semicolons or slashes, only the words `and` and `or`.
//!
//! The pass walks the string once, recursing into parenthesized groups, and
//! records every change as an edit against the untouched source. Edits are
//! applied together at the end so offsets found during the walk stay valid.

use std::sync::LazyLock;

use regex::Regex;

use super::edits::EditList;

// a conjunction right after a comma or semicolon
static NEXT_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[,;]\s+(and|or)\b").expect("valid regex"));

static CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(and|or)\s").expect("valid regex"));

const AND_SYNONYM: &str = "in addition to";

/// Replaces commas, semicolons and slashes with conjunctions.
///
/// Also folds en dashes to hyphens, non-breaking spaces to spaces, and "in
/// addition to" to "and".
#[must_use]
pub fn normalize_conjunctions(text: &str) -> String {
    let mut pass = ConjunctionPass {
        text,
        edits: EditList::default(),
    };
    let mut i = 0;
    while i < text.len() {
        i = pass.scope(i);
    }
    pass.edits.apply(text)
}

struct ConjunctionPass<'a> {
    text: &'a str,
    edits: EditList,
}

impl<'a> ConjunctionPass<'a> {
    /// Walks one scope starting at `i`, returning the index after it.
    ///
    /// A scope ends after its closing parenthesis or at the end of the text.
    fn scope(&mut self, mut i: usize) -> usize {
        let text = self.text;
        let start = i;
        let mut commas: Vec<usize> = Vec::new();
        let mut last_semicolon = start;
        let mut strip_paren = false;

        while let Some(c) = text[i..].chars().next() {
            match c {
                ',' => {
                    if let Some((conjunction, _)) = self.following_conjunction(i) {
                        self.resolve(&mut commas, conjunction);
                        self.edits.delete(i, 1);
                    } else {
                        commas.push(i);
                    }
                }
                '/' => self.edits.replace(i, 1, " or "),
                '(' => {
                    if starts_with_word(&text[i + 1..], "or") {
                        // inline "(or X)" qualifier
                        self.edits.delete(i, 1);
                        strip_paren = true;
                    } else {
                        i = self.scope(i + 1);
                        continue;
                    }
                }
                ')' => {
                    if strip_paren {
                        self.edits.delete(i, 1);
                        strip_paren = false;
                    } else {
                        // parenthesized lists are alternatives
                        self.resolve(&mut commas, "or");
                        return i + 1;
                    }
                }
                ';' => {
                    let conjunction = self.semicolon_conjunction(last_semicolon, i);
                    self.resolve(&mut commas, conjunction);
                    if let Some((_, len)) = self.following_conjunction(i) {
                        self.edits.delete(i, 1);
                        last_semicolon = i + len;
                    } else {
                        self.edits.replace(i, 1, " and");
                        last_semicolon = i;
                    }
                }
                '\u{2013}' => self.edits.replace(i, c.len_utf8(), "-"),
                '\u{a0}' => self.edits.replace(i, c.len_utf8(), " "),
                _ if text[i..].starts_with(AND_SYNONYM) => {
                    self.edits.replace(i, AND_SYNONYM.len(), "and");
                    i += AND_SYNONYM.len();
                    continue;
                }
                _ => {}
            }
            i += c.len_utf8();
        }

        self.resolve(&mut commas, "and");
        i
    }

    /// The conjunction directly after the comma or semicolon at `i`, and the
    /// length of the punctuation-plus-conjunction run.
    fn following_conjunction(&self, i: usize) -> Option<(&'a str, usize)> {
        let text = self.text;
        let captures = NEXT_CONJUNCTION.captures(&text[i..])?;
        let conjunction = captures.get(1)?.as_str();
        let len = captures.get(0)?.len();
        Some((conjunction, len))
    }

    /// Picks the conjunction for commas queued before the semicolon at `i`.
    ///
    /// Looks at the last comma since the previous semicolon. If no conjunction
    /// appears before that comma and exactly one appears after it, that one is
    /// reused. Anything else means `and`.
    fn semicolon_conjunction(&self, last_semicolon: usize, i: usize) -> &'a str {
        let text = self.text;
        let Some(offset) = text[last_semicolon..i].rfind(',') else {
            return "and";
        };
        let last_comma = last_semicolon + offset;
        if CONJUNCTION.is_match(&text[last_semicolon..last_comma]) {
            return "and";
        }
        let found: Vec<&'a str> = CONJUNCTION
            .captures_iter(&text[last_comma..i])
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        match found.as_slice() {
            [only] => *only,
            _ => "and",
        }
    }

    fn resolve(&mut self, commas: &mut Vec<usize>, conjunction: &str) {
        let replacement = format!(" {conjunction}");
        for position in commas.drain(..) {
            self.edits.replace(position, 1, &replacement);
        }
    }
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_alphanumeric()))
}
