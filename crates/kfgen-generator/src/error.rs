use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("{framework} {field} must not be empty")]
    EmptyField {
        framework: &'static str,
        field: &'static str,
    },
}
