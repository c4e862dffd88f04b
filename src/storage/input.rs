use std::{
    ffi::OsStr,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use walkdir::WalkDir;

use crate::storage::StorageError;

/// File holding one [`DepartmentMeta`] per line.
pub const DEPARTMENTS_FILE: &str = "departments.jsonl";

const JSON_LINES_EXTENSION: &str = "jsonl";

/// One course listing as scraped from a department's catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCourse {
    /// The listing's title line, e.g. `CSE 100. Advanced Data Structures (4)`.
    pub title_line: String,
    /// The description paragraph, if the page had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The page anchor of the listing, present on canonical listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Descriptive metadata for a department.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentMeta {
    /// Department code, e.g. `CSE`.
    pub code: String,
    /// Full department name.
    #[serde(default)]
    pub name: String,
    /// Link to the department's catalog page.
    #[serde(default)]
    pub link: String,
}

/// Reads a JSON Lines file.
///
/// Blank lines are ignored; malformed lines are logged and skipped.
pub(crate) fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let read_error = |source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;

    let mut items = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(read_error)?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(
                "Skipping malformed line {} of {}: {e}",
                number + 1,
                path.display()
            ),
        }
    }
    Ok(items)
}

/// Finds the department files in the input directory, returning each file's
/// department code (its uppercased stem) and path, sorted by code.
pub(crate) fn department_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() != DEPARTMENTS_FILE)
        .filter(|entry| entry.path().extension() == Some(OsStr::new(JSON_LINES_EXTENSION)))
        .filter_map(|entry| {
            let code = entry.path().file_stem()?.to_str()?.to_ascii_uppercase();
            Some((code, entry.into_path()))
        })
        .collect();
    files.sort();
    files
}
