//! Domain models for course catalog requirements.
//!
//! This module contains the core domain types: course codes, course records,
//! requirement trees, the catalog-wide successor index, parse metrics, and
//! configuration.

/// Course code and subject types and parsing.
pub mod course_code;
pub use course_code::{CourseCode, Error as CourseCodeError, Subject};

mod course;
pub use course::{CourseHeader, CourseRecord, UNKNOWN_UNITS};

/// Requirement trees.
pub mod requirement;
pub use requirement::{GroupKind, RequirementNode};

/// Catalog index and successor computation.
pub mod catalog;
pub use catalog::{CatalogIndex, SuccessorIndex, build_successor_index};

mod metrics;
pub use metrics::ParseMetrics;

mod config;
pub use config::{Config, ConfigError};
