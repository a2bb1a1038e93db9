//! Well-known file locations, all relative to one root directory.

use std::path::{Path, PathBuf};

/// Resolved locations of every file docchat reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths rooted at the current working directory.
    pub fn current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// `config/settings.json`
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join("settings.json")
    }

    /// `config/system_prompt.txt`
    pub fn system_prompt_file(&self) -> PathBuf {
        self.config_dir().join("system_prompt.txt")
    }

    /// `config/initial_prompts.txt`
    pub fn suggested_prompts_file(&self) -> PathBuf {
        self.config_dir().join("initial_prompts.txt")
    }

    /// `config/secrets.toml`
    pub fn secrets_file(&self) -> PathBuf {
        self.config_dir().join("secrets.toml")
    }

    /// `documents/`
    pub fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    /// `logs/conversations.log`
    pub fn log_file(&self) -> PathBuf {
        self.root.join("logs").join("conversations.log")
    }
}
