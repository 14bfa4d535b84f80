use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rendering and reduction options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    /// Append the decimal form of each router id to its label
    pub decimal_ips: bool,
    /// List stub networks in router labels
    pub include_stubs: bool,
    /// Hostname separator used to build clusters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_separator: Option<String>,
    /// Cluster on the first hostname segment instead of the last
    pub group_by_first_segment: bool,
    /// Merge symmetric link pairs into undirected edges
    pub reduce_links: bool,
    /// Report ambiguous input instead of resolving it silently
    pub strict: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decimal_ips: false,
            include_stubs: true,
            group_separator: None,
            group_by_first_segment: false,
            reduce_links: true,
            strict: false,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(separator) = &self.group_separator {
            if separator.is_empty() {
                return Err(ValidationError::InvalidOptions(
                    "group_separator cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Everything needed for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub hosts: Option<PathBuf>,
    /// Optional JSON dump of the parsed model
    pub dump_model: Option<PathBuf>,
    pub force_overwrite: bool,
    pub options: RenderOptions,
}

impl ConvertConfig {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            hosts: None,
            dump_model: None,
            force_overwrite: false,
            options: RenderOptions::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source.as_os_str().is_empty() {
            return Err(ValidationError::InvalidPaths(
                "source file cannot be empty".to_string(),
            ));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(ValidationError::InvalidPaths(
                "destination file cannot be empty".to_string(),
            ));
        }
        if self.source == self.destination {
            return Err(ValidationError::InvalidPaths(format!(
                "source and destination are the same file: {}",
                self.source.display()
            )));
        }
        self.options.validate()
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid paths: {0}")]
    InvalidPaths(String),
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
}
