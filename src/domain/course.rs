use serde::{Deserialize, Serialize};

use crate::domain::{CourseCode, RequirementNode};

/// Units recorded when a title line has no unit count.
pub const UNKNOWN_UNITS: &str = "?";

/// The identity parsed from a course's title line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseHeader {
    /// The course code, e.g. `CSE 100`.
    pub code: CourseCode,
    /// The course title, trimmed.
    pub title: String,
    /// The unit count as written, or [`UNKNOWN_UNITS`].
    pub units: String,
}

impl CourseHeader {
    /// The subject segment of the code.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.code.subject()
    }

    /// The number segment of the code.
    #[must_use]
    pub fn number(&self) -> &str {
        self.code.number()
    }
}

/// Everything known about one course listing.
///
/// Created once per listing when its title line and description are parsed.
/// `successors` stays empty until the catalog-wide join fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// The course code.
    pub code: CourseCode,
    /// The course title.
    pub title: String,
    /// The unit count as written, or [`UNKNOWN_UNITS`].
    pub units: String,
    /// The department whose listing this record came from.
    pub dept: String,
    /// The raw catalog description.
    pub description: String,
    /// Page anchor identifying the canonical listing, if the catalog had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Prerequisite tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prereqs: Option<RequirementNode>,
    /// Corequisite tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coreqs: Option<RequirementNode>,
    /// Courses listing this one as a prerequisite, sorted and unique.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub successors: Vec<CourseCode>,
}

impl CourseRecord {
    /// Creates a record from a parsed header with no requirements.
    #[must_use]
    pub fn new(header: CourseHeader, dept: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: header.code,
            title: header.title,
            units: header.units,
            dept: dept.into(),
            description: description.into(),
            anchor: None,
            prereqs: None,
            coreqs: None,
            successors: Vec::new(),
        }
    }

    /// Whether this copy carries the anchor that marks a canonical listing.
    #[must_use]
    pub const fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let header = CourseHeader {
            code: "CSE 100".parse().unwrap(),
            title: "Advanced Data Structures".to_string(),
            units: "4".to_string(),
        };
        let record = CourseRecord::new(header, "CSE", "Data structures.");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "code": "CSE 100",
                "title": "Advanced Data Structures",
                "units": "4",
                "dept": "CSE",
                "description": "Data structures."
            })
        );
    }
}
