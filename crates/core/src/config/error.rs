//! Errors raised while loading a `.batch-step/` directory.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or does not match `GlobalConfig`.
    #[error("Invalid global settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A batch file is not valid YAML or does not describe a batch.
    #[error("Invalid batch file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Cannot list batch files in {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Two batch files declare the same process id.
    #[error("Process id '{process_id}' in {path} is already declared in {first}")]
    DuplicateProcess {
        process_id: String,
        path: PathBuf,
        first: PathBuf,
    },

    /// Parsed, but the values are out of range.
    #[error("Invalid configuration in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
