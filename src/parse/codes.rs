//! Expansion of shorthand course codes.
//!
//! Catalog text often writes `MATH 20A, 20B` or `CSE 100A-C`, leaving the
//! subject or the whole range implicit. These passes rewrite the string so
//! every course appears as a full `SUBJECT NUMBER` code.

use std::sync::LazyLock;

use regex::{Captures, Regex};

// A full code (subject and digits), or a whitespace-led shorthand token: a
// number, or one or two letters. The letter form must not be followed by
// another letter, which is checked by hand.
static CODE_OR_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<subject>[A-Z]{2,})\s(?P<subject_digits>[0-9]+)[A-Z]*|\s(?:(?P<number>[0-9]+)[A-Z]*\S*|(?P<letters>[A-Z]{1,2}))",
    )
    .expect("valid regex")
});

// The start of a sequence; must be directly followed by a hyphen.
static SEQUENCE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<subject>[A-Z]{2,})\s(?P<digits>[0-9]+)(?P<letters>[A-Z]*)")
        .expect("valid regex")
});

static SEQUENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-(?:(?:[A-Z]{3,}|SE)\s)?(?P<digits>[0-9]*)(?P<letters>[A-Z]*)")
        .expect("valid regex")
});

// Wider number ranges are taken as typos and keep only their end code.
const MAX_SEQUENCE_SPAN: u32 = 50;

enum Token<'a> {
    Code { subject: &'a str, digits: &'a str },
    Number { digits: &'a str },
    Letters { start: usize },
}

struct Found<'a> {
    start: usize,
    len: usize,
    token: Token<'a>,
}

/// Finds the next full code or shorthand token at or after `from`.
fn next_token(text: &str, mut from: usize) -> Option<Found<'_>> {
    loop {
        let captures = CODE_OR_SHORTHAND.captures_at(text, from)?;
        let whole = captures.get(0)?;
        if let Some(token) = classify(text, &captures) {
            return Some(Found {
                start: whole.start(),
                len: whole.len(),
                token,
            });
        }
        from = whole.start() + 1;
    }
}

fn classify<'a>(text: &'a str, captures: &Captures<'a>) -> Option<Token<'a>> {
    if let (Some(subject), Some(digits)) = (captures.name("subject"), captures.name("subject_digits")) {
        return Some(Token::Code {
            subject: subject.as_str(),
            digits: digits.as_str(),
        });
    }
    if let Some(digits) = captures.name("number") {
        return Some(Token::Number {
            digits: digits.as_str(),
        });
    }
    let letters = captures.name("letters")?;
    let followed_by_letter = text[letters.end()..]
        .chars()
        .next()
        .is_some_and(|c| ('A'..='z').contains(&c));
    // `SE` is the only two-letter subject in the catalog; any other
    // two capitals here are read as a letter suffix.
    if followed_by_letter || letters.as_str() == "SE" {
        return None;
    }
    Some(Token::Letters {
        start: letters.start(),
    })
}

/// Inserts omitted subjects and numbers into shorthand codes.
///
/// A number-only token (`20B`) takes the subject of the nearest full code
/// before it; a letter-only token (`B`) takes that code's subject and
/// number. Each run of codes filled from one subject is wrapped in
/// parentheses, together with the code that supplied the subject, so the run
/// stays one group under the surrounding operators. A run spanning the
/// whole string is left unwrapped.
///
/// Strings with no shorthand are returned unchanged.
#[must_use]
pub fn fill_incomplete_codes(text: &str) -> String {
    let mut s = text.to_string();
    let mut last_subject = String::new();
    let mut last_digits = String::new();
    let mut scope_start = 0;
    let mut scope_end = 0;
    let mut filled = 0_usize;

    let mut i = 0;
    while i < s.len() {
        let Some(found) = next_token(&s, i) else {
            break;
        };
        i = found.start;
        let len = found.len;
        match found.token {
            Token::Code { subject, digits } => {
                last_subject = subject.to_string();
                last_digits = digits.to_string();
                if filled > 0 {
                    wrap(&mut s, scope_start, scope_end);
                    i += 2;
                }
                filled = 0;
                scope_start = i;
            }
            // nothing to inherit from yet
            Token::Number { .. } | Token::Letters { .. } if last_subject.is_empty() => {}
            Token::Number { digits } => {
                last_digits = digits.to_string();
                let inserted = format!(" {last_subject}");
                s.insert_str(i, &inserted);
                i += inserted.len();
                filled += 1;
            }
            Token::Letters { start } => {
                let inserted = format!("{last_subject} {last_digits}");
                s.insert_str(start, &inserted);
                i += inserted.len();
                filled += 1;
            }
        }

        i += len;
        scope_end = i;
    }

    if filled > 0 && !(scope_start == 0 && scope_end >= s.len()) {
        wrap(&mut s, scope_start, scope_end);
    }
    s
}

fn wrap(s: &mut String, start: usize, end: usize) {
    s.insert(end, ')');
    s.insert(start, '(');
}

/// Expands code sequences such as `CSE 100A-C` or `BILD 1-3` into the codes
/// they cover, joined with `and` and wrapped in parentheses.
#[must_use]
pub fn expand_code_sequences(text: &str) -> String {
    let mut s = text.to_string();
    let mut i = 0;
    while i < s.len() {
        let Some((span_start, start_end, subject, digits, letters)) = next_sequence_start(&s, i)
        else {
            break;
        };

        let mut expanded = s[span_start..start_end].to_string();
        let mut digits = digits;
        let mut letters = letters;
        let mut j = start_end;
        while let Some(end) = SEQUENCE_END.captures(&s[j..]) {
            let end_digits = end.name("digits").map_or("", |m| m.as_str());
            let end_letters = end.name("letters").map_or("", |m| m.as_str());

            if !end_digits.is_empty() && end_digits != digits {
                match (digits.parse::<u32>(), end_digits.parse::<u32>()) {
                    (Ok(first), Ok(last))
                        if letters.is_empty()
                            && end_letters.is_empty()
                            && last
                                .checked_sub(first)
                                .is_some_and(|span| span <= MAX_SEQUENCE_SPAN) =>
                    {
                        for number in first + 1..=last {
                            expanded.push_str(&format!(" and {subject} {number}"));
                        }
                    }
                    _ => expanded.push_str(&format!(" and {subject} {end_digits}{end_letters}")),
                }
                digits = end_digits.to_string();
                letters = end_letters.to_string();
            } else if !end_letters.is_empty() {
                if letters.is_empty() || letters.len() != end_letters.len() {
                    expanded.push_str(&format!(" and {subject} {digits}{end_letters}"));
                } else {
                    let first = letters.as_bytes()[0];
                    let last = end_letters.as_bytes()[0];
                    for letter in first + 1..last {
                        let next = format!("{}{}", char::from(letter), &letters[1..]);
                        expanded.push_str(&format!(" and {subject} {digits}{next}"));
                    }
                    expanded.push_str(&format!(" and {subject} {digits}{end_letters}"));
                }
                letters = end_letters.to_string();
            }

            j += end.get(0).map_or(1, |m| m.len());
        }

        let replacement = format!("({expanded})");
        s.replace_range(span_start..j, &replacement);
        i = span_start + replacement.len();
    }
    s
}

/// Finds the next `SUBJECT DIGITS[LETTERS]` directly followed by a hyphen.
fn next_sequence_start(s: &str, mut from: usize) -> Option<(usize, usize, String, String, String)> {
    loop {
        let captures = SEQUENCE_START.captures_at(s, from)?;
        let whole = captures.get(0)?;
        if s[whole.end()..].starts_with('-') {
            return Some((
                whole.start(),
                whole.end(),
                captures["subject"].to_string(),
                captures["digits"].to_string(),
                captures["letters"].to_string(),
            ));
        }
        from = whole.start() + 1;
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("MATH 20A and 20B and 20C", "MATH 20A and MATH 20B and MATH 20C"; "whole string scope is not wrapped")]
    #[test_case("CSE 12 or 15 and MATH 18", "(CSE 12 or CSE 15) and MATH 18"; "scope closed by next subject")]
    #[test_case("MATH 18 and CSE 12 or 15", "MATH 18 and (CSE 12 or CSE 15)"; "scope closed by end")]
    #[test_case("CHEM 6A or B", "CHEM 6A or CHEM 6B"; "letter shorthand")]
    #[test_case("PHYS 2A and 2B or C", "PHYS 2A and PHYS 2B or PHYS 2C"; "letter after number shorthand")]
    fn fills(input: &str, expected: &str) {
        assert_eq!(fill_incomplete_codes(input), expected);
    }

    #[test_case("CSE 12 and MATH 18 or (CSE 30)"; "plain codes")]
    #[test_case("one of CSE 21 or CSE 101 or MATH 154"; "one of")]
    #[test_case("SE 101 and SE 110A"; "two letter subject")]
    #[test_case("CSE 100A-C"; "sequence")]
    fn fill_is_noop_on_qualified_codes(input: &str) {
        assert_eq!(fill_incomplete_codes(input), input);
    }

    #[test]
    fn subject_token_se_is_not_shorthand() {
        assert_eq!(
            fill_incomplete_codes("MAE 3 and SE 1"),
            "MAE 3 and SE 1"
        );
    }

    #[test_case("CSE 100A-C", "(CSE 100A and CSE 100B and CSE 100C)"; "letter range")]
    #[test_case("BILD 1-3", "(BILD 1 and BILD 2 and BILD 3)"; "number range")]
    #[test_case("MATH 20A-MATH 20C", "(MATH 20A and MATH 20B and MATH 20C)"; "repeated subject")]
    #[test_case("MATH 20A-B-C", "(MATH 20A and MATH 20B and MATH 20C)"; "chained")]
    #[test_case("PHYS 1A-2B", "(PHYS 1A and PHYS 2B)"; "numbers and letters differ")]
    #[test_case("CSE 12 or ECE 15-16 and MATH 18", "CSE 12 or (ECE 15 and ECE 16) and MATH 18"; "embedded")]
    #[test_case("BILD 1-4000000000", "(BILD 1 and BILD 4000000000)"; "oversized range keeps end")]
    #[test_case("BILD 1-99999999999", "(BILD 1 and BILD 99999999999)"; "unparseable range keeps end")]
    #[test_case("BILD 3-1", "(BILD 3 and BILD 1)"; "descending range keeps end")]
    fn expands(input: &str, expected: &str) {
        assert_eq!(expand_code_sequences(input), expected);
    }

    #[test]
    fn expansion_leaves_plain_codes_alone() {
        let input = "CSE 12 and (CSE 15L or CSE 30)";
        assert_eq!(expand_code_sequences(input), input);
    }
}
