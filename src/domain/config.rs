use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a catalog build.
///
/// Stored as `config.toml` in the catalog root. Paths are relative to that
/// root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Directory holding the scraped JSON Lines input.
    ///
    /// Contains `departments.jsonl` and one `<DEPT>.jsonl` per department.
    intermediate_dir: PathBuf,

    /// Directory the finished JSON output is written to.
    data_dir: PathBuf,

    /// Whether departments are parsed in parallel.
    ///
    /// Output is identical either way.
    pub parallel: bool,

    /// Whether JSON output is indented.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            intermediate_dir: default_intermediate_dir(),
            data_dir: default_data_dir(),
            parallel: true,
            pretty: true,
        }
    }
}

/// Errors that can occur while loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `config.toml` from the catalog root, falling back to defaults.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Name of the configuration file in the catalog root.
    pub const FILE_NAME: &'static str = "config.toml";

    /// The input directory, relative to the catalog root.
    #[must_use]
    pub fn intermediate_dir(&self) -> &Path {
        &self.intermediate_dir
    }

    /// The output directory, relative to the catalog root.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn default_intermediate_dir() -> PathBuf {
    PathBuf::from("intermediate")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

const fn default_true() -> bool {
    true
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_intermediate_dir")]
        intermediate_dir: PathBuf,

        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,

        #[serde(default = "default_true")]
        parallel: bool,

        #[serde(default = "default_true")]
        pretty: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                intermediate_dir,
                data_dir,
                parallel,
                pretty,
            } => Self {
                intermediate_dir,
                data_dir,
                parallel,
                pretty,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            intermediate_dir: config.intermediate_dir,
            data_dir: config.data_dir,
            parallel: config.parallel,
            pretty: config.pretty,
        }
    }
}
