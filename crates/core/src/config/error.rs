//! Error types for configuration loading and validation.
//!
//! Every error here is fatal at load time: a pipeline definition either
//! loads completely or not at all, and a run never starts against a
//! partially loaded definition.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a pipeline definition.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to walk directory structure.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Two pipeline files declared the same pipeline name.
    #[error("Duplicate pipeline name '{name}' (second definition in {path})")]
    DuplicatePipeline { name: String, path: PathBuf },

    /// A step name does not resolve to a registered task or branching entry.
    #[error("Step '{step}' in {referenced_by} resolves to no registered task and no branching entry")]
    UnresolvedStep { step: String, referenced_by: String },

    /// A branching entry targets a sub-pipeline that is not defined.
    #[error("Branching for step '{step}' targets unknown sub-pipeline '{target}'")]
    UnknownSubPipeline { step: String, target: String },

    /// Two steps reachable within one pipeline declare the same output key.
    #[error("Output key '{key}' in pipeline '{pipeline}' is written by both '{first}' and '{second}'")]
    DuplicateOutputKey {
        pipeline: String,
        key: String,
        first: String,
        second: String,
    },

    /// Scoring weights must sum to 1.0.
    #[error("Scoring weights sum to {sum}, expected 1.0")]
    InvalidWeights { sum: f64 },

    /// Invalid configuration structure or missing required fields.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
