//! A catalog build rooted in a directory.
//!
//! The [`CatalogDirectory`] reads scraped listings from the input directory,
//! runs every listing through the text pipeline, joins the results into a
//! [`CatalogIndex`] and writes the finished JSON to the output directory.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::instrument;

use crate::{
    domain::{CatalogIndex, Config, CourseCode, CourseRecord, ParseMetrics},
    parse::{RequirementParser, parse_course_line},
    storage::{
        DepartmentMeta, RawCourse, Statistics,
        input::{DEPARTMENTS_FILE, department_files, read_json_lines},
        output::write_json,
    },
};

/// Description recorded for listings that have none.
pub const MISSING_DESCRIPTION: &str = "Missing description";

/// Output file holding the department index.
pub const DEPARTMENTS_OUTPUT: &str = "departments.json";

/// Output file holding the build statistics.
pub const STATISTICS_OUTPUT: &str = "statistics.json";

/// Errors that abort a catalog build.
///
/// Problems with individual listings or department files never abort a
/// build; they are logged and counted instead.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The input directory does not exist.
    #[error("Input directory {} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A file or directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A value could not be rendered as JSON.
    #[error("Failed to serialize {}: {source}", path.display())]
    Serialize {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
}

/// A department's entry in the department index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    /// Code, name and link.
    #[serde(flatten)]
    pub meta: DepartmentMeta,
    /// Every course listed by the department, in page order.
    pub courses: Vec<CourseCode>,
}

impl Department {
    fn unlisted(code: &str) -> Self {
        Self {
            meta: DepartmentMeta {
                code: code.to_string(),
                ..DepartmentMeta::default()
            },
            courses: Vec::new(),
        }
    }
}

/// The result of parsing a whole catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Authoritative records and the successor index.
    pub index: CatalogIndex,
    /// Department index, keyed by department code.
    pub departments: BTreeMap<String, Department>,
    /// Diagnostics gathered across the build.
    pub metrics: ParseMetrics,
}

/// A catalog root: `config.toml` plus the input and output directories.
#[derive(Debug, Clone)]
pub struct CatalogDirectory {
    root: PathBuf,
    config: Config,
}

impl CatalogDirectory {
    /// Opens a catalog root, loading its configuration or the defaults.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let config = Config::load_or_default(&root);
        Self { root, config }
    }

    /// Opens a catalog root with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The catalog root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The directory scraped listings are read from.
    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        self.root.join(self.config.intermediate_dir())
    }

    /// The directory finished JSON is written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(self.config.data_dir())
    }

    /// Parses every department file and joins the results.
    ///
    /// Departments are processed in code order and listings in file order,
    /// which fixes the order crosslisted copies are seen in. With
    /// `parallel` set, departments are parsed on the rayon pool; the results
    /// are merged in the same order, so the output does not change.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingInput`] if the input directory does not
    /// exist. Unreadable files and malformed lines are logged and skipped.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<BuildOutput, StorageError> {
        let input = self.input_dir();
        if !input.is_dir() {
            return Err(StorageError::MissingInput(input));
        }

        let mut departments: BTreeMap<String, Department> = read_department_meta(&input)
            .into_iter()
            .map(|meta| {
                let code = meta.code.clone();
                let department = Department {
                    meta,
                    courses: Vec::new(),
                };
                (code, department)
            })
            .collect();

        let files = department_files(&input);
        let parser = RequirementParser::new();
        let parsed: Vec<ParsedDepartment> = if self.config.parallel {
            files
                .par_iter()
                .map(|(code, path)| load_department(code, path, &parser))
                .collect()
        } else {
            files
                .iter()
                .map(|(code, path)| load_department(code, path, &parser))
                .collect()
        };

        let mut metrics = ParseMetrics::default();
        let mut records = Vec::new();
        for department in parsed {
            metrics += department.metrics;
            departments
                .entry(department.code.clone())
                .or_insert_with(|| Department::unlisted(&department.code))
                .courses = department.records.iter().map(|r| r.code.clone()).collect();
            records.extend(department.records);
        }

        let index = CatalogIndex::build(records, &mut metrics);
        tracing::info!(
            "Parsed {} courses from {} departments",
            index.len(),
            metrics.departments
        );

        Ok(BuildOutput {
            index,
            departments,
            metrics,
        })
    }

    /// Writes one file per course, the department index and the statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory or any file cannot be
    /// written.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn write(&self, output: &BuildOutput) -> Result<Statistics, StorageError> {
        let dir = self.output_dir();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
            path: dir.clone(),
            source,
        })?;

        let pretty = self.config.pretty;
        let courses: Vec<&CourseRecord> = output.index.courses().collect();
        let write_course = |record: &&CourseRecord| {
            let path = dir.join(format!("{}.json", record.code.file_stem()));
            write_json(&path, *record, pretty)
        };
        if self.config.parallel {
            courses.par_iter().try_for_each(write_course)?;
        } else {
            courses.iter().try_for_each(write_course)?;
        }

        write_json(&dir.join(DEPARTMENTS_OUTPUT), &output.departments, pretty)?;

        let statistics = Statistics::new(&output.metrics, output.index.len(), &chrono::Local::now());
        write_json(&dir.join(STATISTICS_OUTPUT), &statistics, pretty)?;

        tracing::info!("Wrote {} courses to {}", courses.len(), dir.display());
        Ok(statistics)
    }
}

fn read_department_meta(input: &Path) -> Vec<DepartmentMeta> {
    let path = input.join(DEPARTMENTS_FILE);
    read_json_lines(&path).unwrap_or_else(|e| {
        tracing::warn!("Failed to read departments: {e}");
        Vec::new()
    })
}

struct ParsedDepartment {
    code: String,
    records: Vec<CourseRecord>,
    metrics: ParseMetrics,
}

fn load_department(code: &str, path: &Path, parser: &RequirementParser) -> ParsedDepartment {
    let mut metrics = ParseMetrics::default();
    let records = match read_json_lines::<RawCourse>(path) {
        Ok(entries) => {
            metrics.departments += 1;
            parse_department(code, entries, parser, &mut metrics)
        }
        Err(e) => {
            tracing::warn!("Skipping {code} courses: {e}");
            Vec::new()
        }
    };
    ParsedDepartment {
        code: code.to_string(),
        records,
        metrics,
    }
}

/// Turns a department's scraped listings into course records.
///
/// Listings whose title line has no recognizable code are skipped. A listing
/// without a description is kept, with [`MISSING_DESCRIPTION`] and no
/// requirements.
pub fn parse_department(
    dept: &str,
    entries: Vec<RawCourse>,
    parser: &RequirementParser,
    metrics: &mut ParseMetrics,
) -> Vec<CourseRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        metrics.courses += 1;
        let Some(header) = parse_course_line(&entry.title_line, metrics) else {
            continue;
        };

        if entry.anchor.is_none() {
            tracing::warn!("Missing anchor for {} in {dept}", header.code);
            metrics.missing_anchors += 1;
        }

        let mut record = match entry.description {
            Some(description) => {
                let requirements = parser.parse_requirements(&description, metrics);
                let mut record = CourseRecord::new(header, dept, description);
                record.prereqs = requirements.prerequisites;
                record.coreqs = requirements.corequisites;
                record
            }
            None => {
                tracing::error!("Missing description for {} in {dept}", header.code);
                metrics.missing_descriptions += 1;
                CourseRecord::new(header, dept, MISSING_DESCRIPTION)
            }
        };
        record.anchor = entry.anchor;
        records.push(record);
    }
    records
}
