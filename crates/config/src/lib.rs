//! Configuration loading for docchat.
//!
//! Every loader here degrades instead of failing: a missing or malformed file
//! produces the built-in default plus a warning for the presentation surface.
//! The only hard failure is a missing API key (see [`credential`]).

pub mod credential;
pub mod paths;
pub mod prompts;
pub mod settings;

use std::path::PathBuf;

pub use credential::{API_KEY_VAR, ApiKey, resolve_api_key};
pub use paths::WorkspacePaths;
pub use prompts::{
    DEFAULT_SYSTEM_PROMPT, MAX_DISPLAYED_SUGGESTIONS, SuggestedPrompts, load_suggested_prompts,
    load_system_prompt,
};
pub use settings::{Settings, load_settings};

/// A loaded value together with the non-fatal problems hit while loading it.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Loaded<T> {
    /// A clean load.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A load that fell back or dropped something.
    pub fn degraded(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warnings: vec![warning.into()],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("API key not found: set {var} in {secrets} or in the environment")]
    MissingCredential { var: &'static str, secrets: PathBuf },
}

impl From<ConfigError> for docchat_core::Error {
    fn from(err: ConfigError) -> Self {
        docchat_core::Error::Config {
            message: err.to_string(),
        }
    }
}
