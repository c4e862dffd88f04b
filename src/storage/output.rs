use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::{domain::ParseMetrics, storage::StorageError};

/// Summary written to `statistics.json` after a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// When the build ran, to the minute.
    pub timestamp: String,
    /// Departments processed.
    pub dept_count: usize,
    /// Distinct courses written.
    pub course_count: usize,
    /// Courses with prerequisites.
    pub with_prereqs_count: usize,
    /// Courses with corequisites.
    pub with_coreqs_count: usize,
    /// Courses that are a prerequisite of another course.
    pub with_successors_count: usize,
}

impl Statistics {
    /// Summarizes a build of `course_count` distinct courses.
    #[must_use]
    pub fn new<Tz: TimeZone>(metrics: &ParseMetrics, course_count: usize, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            timestamp: now.format("%Y-%m-%dT%H:%M").to_string(),
            dept_count: metrics.departments,
            course_count,
            with_prereqs_count: metrics.with_prerequisites,
            with_coreqs_count: metrics.with_corequisites,
            with_successors_count: metrics.with_successors,
        }
    }
}

/// Writes `value` as a JSON document, indented when `pretty` is set.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), StorageError> {
    let write_error = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    let serialize_error = |source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value).map_err(serialize_error)?;
    } else {
        serde_json::to_writer(&mut writer, value).map_err(serialize_error)?;
    }
    writeln!(writer).map_err(write_error)?;
    writer.flush().map_err(write_error)
}
