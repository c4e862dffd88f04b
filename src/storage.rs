//! Filesystem storage for catalog builds.
//!
//! Input is the scraped catalog as JSON Lines: `departments.jsonl` plus one
//! `<DEPT>.jsonl` per department. Output is one JSON file per course, a
//! department index and build statistics.

/// The catalog root and the build driver.
pub mod directory;
pub use directory::{BuildOutput, CatalogDirectory, Department, StorageError, parse_department};

mod input;
pub use input::{DepartmentMeta, RawCourse};

mod output;
pub use output::Statistics;
