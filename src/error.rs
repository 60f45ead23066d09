//! Error types.
//!
//! Scene logic is total and never fails; only the edges (config file,
//! terminal) can.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    /// Terminal setup or drawing failed.
    pub const TERMINAL_ERROR: i32 = 1;
    /// Config file unreadable or invalid.
    pub const CONFIG_ERROR: i32 = 2;
}

#[derive(Debug, Error)]
pub enum ShowcaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl ShowcaseError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            ShowcaseError::Config(_) => ExitCode::CONFIG_ERROR,
            ShowcaseError::Terminal(_) => ExitCode::TERMINAL_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
