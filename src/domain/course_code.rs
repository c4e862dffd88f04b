use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated department subject: two or more uppercase ASCII letters.
///
/// Used for the first segment of a [`CourseCode`], e.g. `CSE` or `MATH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subject(NonEmptyString);

impl Subject {
    /// Creates a new `Subject`, normalizing it to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSubjectError`] if the string is shorter than two
    /// characters or contains anything other than ASCII letters.
    pub fn new(s: &str) -> Result<Self, InvalidSubjectError> {
        let upper = s.trim().to_ascii_uppercase();
        if upper.len() < 2 || !upper.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(InvalidSubjectError(s.to_string()));
        }
        let non_empty = NonEmptyString::new(upper).map_err(|_| InvalidSubjectError(s.to_string()))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Subject {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a subject doesn't match `[A-Z]{2,}`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid subject '{0}': must be at least two letters (A-Z)")]
pub struct InvalidSubjectError(String);

/// A course code, `SUBJECT NUMBER[LETTERS]`.
///
/// Equality and ordering are those of the normalized string form (uppercase
/// subject, one space, number), so `"cse  100a"` and `"CSE 100A"` are the same
/// code and codes sort the way their strings do.
///
/// The number is kept as written in the catalog. It is usually digits
/// followed by optional letters (`100A`), but sequence listings keep their
/// range (`100A-C`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseCode {
    // `text` first so the derived ordering is plain string comparison.
    text: String,
    subject_len: usize,
}

impl CourseCode {
    /// Builds a code from a validated subject and a number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Number`] if the number is empty or contains
    /// whitespace.
    pub fn new(subject: &Subject, number: &str) -> Result<Self, Error> {
        let number = number.trim().to_ascii_uppercase();
        if number.is_empty() || number.contains(char::is_whitespace) {
            return Err(Error::Number(number));
        }
        Ok(Self {
            text: format!("{subject} {number}"),
            subject_len: subject.len(),
        })
    }

    /// The subject segment, e.g. `CSE`.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.text[..self.subject_len]
    }

    /// The number segment, e.g. `100A`.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.text[self.subject_len + 1..]
    }

    /// The normalized string form, e.g. `CSE 100A`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// File stem used for per-course output files (`CSE_100A`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.text.replace(' ', "_")
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Errors that can occur while parsing a [`CourseCode`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The string is not `SUBJECT NUMBER`.
    #[error("Invalid course code format: {0}")]
    Syntax(String),

    /// The number segment is empty or malformed.
    #[error("Invalid course number: '{0}'")]
    Number(String),

    /// The subject segment is malformed.
    #[error(transparent)]
    Subject(#[from] InvalidSubjectError),
}

impl FromStr for CourseCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(subject), Some(number), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Syntax(s.to_string()));
        };
        Self::new(&Subject::new(subject)?, number)
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl Serialize for CourseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for CourseCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
