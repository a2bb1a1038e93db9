//! System prompt and suggested prompt files.

use std::path::Path;

use tracing::{debug, warn};

use crate::{ConfigError, Loaded};

/// Used when `config/system_prompt.txt` is missing, unreadable or blank.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. You're friendly, concise, and informative.";

/// The surface shows at most this many suggestions.
pub const MAX_DISPLAYED_SUGGESTIONS: usize = 6;

const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "What can you help me with?",
    "Tell me about yourself.",
    "How does this work?",
];

/// Load the system prompt. The whole file is used, trimmed.
///
/// A file that exists but holds only whitespace is treated like a missing
/// one: the default prompt is used and a warning is returned. A blank
/// prompt would leave the model with no instructions at all.
pub fn load_system_prompt(path: &Path) -> Loaded<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => {
            debug!(path = %path.display(), chars = content.len(), "System prompt loaded");
            Loaded::ok(content.trim().to_string())
        }
        Ok(_) => {
            warn!(path = %path.display(), "System prompt file is empty");
            Loaded::degraded(
                DEFAULT_SYSTEM_PROMPT.to_string(),
                format!("System prompt file {} is empty. Using default.", path.display()),
            )
        }
        Err(e) => {
            let err = ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            warn!("{err}");
            Loaded::degraded(
                DEFAULT_SYSTEM_PROMPT.to_string(),
                format!("Could not load system prompt. Using default. Error: {err}"),
            )
        }
    }
}

/// Ordered suggested prompts, one per non-blank line of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPrompts(Vec<String>);

impl SuggestedPrompts {
    /// Build from raw lines. Lines are trimmed and blank ones skipped; an
    /// empty result falls back to the built-in defaults.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let prompts: Vec<String> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if prompts.is_empty() {
            Self::default()
        } else {
            Self(prompts)
        }
    }

    /// Every loaded prompt.
    pub fn all(&self) -> &[String] {
        &self.0
    }

    /// The prompts the surface may show: the first six.
    pub fn for_display(&self) -> &[String] {
        let end = self.0.len().min(MAX_DISPLAYED_SUGGESTIONS);
        &self.0[..end]
    }
}

impl Default for SuggestedPrompts {
    fn default() -> Self {
        Self(DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect())
    }
}

/// Load suggested prompts. A missing file silently yields the defaults, the
/// same as an empty one.
pub fn load_suggested_prompts(path: &Path) -> Loaded<SuggestedPrompts> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let prompts = SuggestedPrompts::from_lines(content.lines());
            debug!(path = %path.display(), count = prompts.all().len(), "Suggested prompts loaded");
            Loaded::ok(prompts)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No suggested prompts file, using defaults");
            Loaded::ok(SuggestedPrompts::default())
        }
    }
}
