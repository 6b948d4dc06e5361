//! Task configuration
//!
//! A TOML file describes where input files live, where the error log goes, and
//! one or more tasks. Each task selects its inputs by filter conditions, parses
//! their names with a schema, and names its output from configured fields:
//!
//! ```toml
//! data_directory = "data/"
//! error_directory = "errors/"
//! delimiter = "-"
//!
//! [[tasks]]
//! name = "orders"
//! output_directory = "output/orders/"
//! output_filename = ["orders", "summary"]
//! output_extension = ".md"
//!
//! [[tasks.inputs]]
//! name = "north"
//! filter_conditions = ["north", "orders"]
//! schema = ["site", "year", "kind", "extension"]
//! casts = { year = "int" }
//! ```

use crate::cast::CastRules;
use crate::error::{NamecastError, Result};
use crate::record::ParsedRecord;
use crate::schema::FilenameSchema;
use crate::sink::ErrorSink;
use namecast_logging::namecast_home;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "namecast.toml";
pub const DEFAULT_FILE_ORIGIN: &str = "namecast";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder searched for task inputs
    #[serde(default = "default_data_directory")]
    pub data_directory: String,

    /// Folder the error log is flushed into
    #[serde(default = "default_error_directory")]
    pub error_directory: String,

    /// Delimiter between schema fields
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// File origin label for the error log
    #[serde(default = "default_file_origin")]
    pub file_origin: String,

    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,

    pub output_directory: String,

    /// Field values joined into the output filename
    #[serde(default)]
    pub output_filename: Vec<String>,

    #[serde(default)]
    pub output_extension: Option<String>,

    /// Error log folder for this task. The top-level folder applies otherwise.
    #[serde(default)]
    pub error_directory: Option<String>,

    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub name: String,

    #[serde(default)]
    pub filter_conditions: Vec<String>,

    pub schema: Vec<String>,

    /// Field name to cast tag
    #[serde(default)]
    pub casts: BTreeMap<String, String>,
}

fn default_data_directory() -> String {
    "data/".to_string()
}

/// Error log folder: <home>/errors/
pub fn default_error_directory() -> String {
    format!("{}/", namecast_home().join("errors").display())
}

fn default_delimiter() -> String {
    "-".to_string()
}

fn default_file_origin() -> String {
    DEFAULT_FILE_ORIGIN.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            error_directory: default_error_directory(),
            delimiter: default_delimiter(),
            file_origin: default_file_origin(),
            tasks: Vec::new(),
        }
    }
}

/// Default config path: <home>/namecast.toml
pub fn default_config_path() -> PathBuf {
    namecast_home().join(CONFIG_FILE_NAME)
}

impl Settings {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NamecastError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| NamecastError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| NamecastError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }

    fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(NamecastError::Config("delimiter must not be empty".to_string()));
        }
        for task in &self.tasks {
            for input in &task.inputs {
                input.schema().map_err(|e| {
                    NamecastError::Config(format!(
                        "task '{}' input '{}': {}",
                        task.name, input.name, e
                    ))
                })?;
            }
        }
        Ok(())
    }
}

impl TaskConfig {
    /// Record for the output filename, one field per configured value.
    pub fn output_record(&self) -> ParsedRecord {
        ParsedRecord::from_fields(
            self.output_filename
                .iter()
                .enumerate()
                .map(|(i, value)| (format!("part_{}", i), value.as_str())),
        )
    }
}

impl InputConfig {
    pub fn schema(&self) -> Result<FilenameSchema> {
        FilenameSchema::new(self.schema.iter().cloned())
    }

    /// Cast rules for this input. Unknown tags are recorded on `sink`.
    pub fn cast_rules(&self, sink: &mut ErrorSink) -> CastRules {
        CastRules::from_tags(
            self.casts.iter().map(|(field, tag)| (field.as_str(), tag.as_str())),
            sink,
        )
    }
}
