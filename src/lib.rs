//! Course catalog requirement parsing
//!
//! Catalog descriptions state prerequisites in prose: "Prerequisites: MATH
//! 20A, 20B, and 20C; CSE 11 or CSE 8B." This crate turns that prose into
//! requirement trees over course codes, and joins the trees of a whole
//! catalog into a successor ("leads to") index.

pub mod domain;
pub use domain::{
    CatalogIndex, Config, ConfigError, CourseCode, CourseCodeError, CourseHeader, CourseRecord,
    GroupKind, ParseMetrics, RequirementNode, Subject, build_successor_index,
};

pub mod parse;
pub use parse::{RequirementParser, Requirements, extract_requirements, parse_course_line};

pub mod storage;
pub use storage::{BuildOutput, CatalogDirectory, StorageError};
