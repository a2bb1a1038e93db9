//! Append-only conversation transcript at `logs/conversations.log`.
//!
//! Each turn is two labeled lines followed by a 50-character separator.
//! Single writer assumed; no rotation.

use std::io::Write;
use std::path::{Path, PathBuf};

use docchat_config::Settings;
use tracing::debug;

/// Width of the `-` line closing each entry.
pub const SEPARATOR_WIDTH: usize = 50;

/// Errors writing the transcript. Never fatal to a turn.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write conversation log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The transcript file.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one turn when logging is enabled.
    ///
    /// Returns `Ok(false)` without touching the filesystem when
    /// `enable_logging` is off, `Ok(true)` once the entry is written.
    pub fn log_turn(
        &self,
        user_message: &str,
        assistant_message: &str,
        settings: &Settings,
    ) -> Result<bool, TranscriptError> {
        if !settings.enable_logging {
            return Ok(false);
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| TranscriptError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source| TranscriptError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(format_entry(user_message, assistant_message).as_bytes())
            .map_err(write_err)?;

        debug!(path = %self.path.display(), "Turn appended to conversation log");
        Ok(true)
    }
}

/// Render one transcript entry.
pub fn format_entry(user_message: &str, assistant_message: &str) -> String {
    format!(
        "User: {user_message}\nAssistant: {assistant_message}\n{}\n",
        "-".repeat(SEPARATOR_WIDTH)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn logging_on() -> Settings {
        Settings {
            enable_logging: true,
            ..Settings::default()
        }
    }

    #[test]
    fn entry_format() {
        let entry = format_entry("Hi", "Hello!");
        assert_eq!(entry, format!("User: Hi\nAssistant: Hello!\n{}\n", "-".repeat(50)));
    }

    #[test]
    fn disabled_logging_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let log = TranscriptLog::new(tmp.path().join("logs").join("conversations.log"));

        for _ in 0..5 {
            assert!(!log.log_turn("q", "a", &Settings::default()).unwrap());
        }
        assert!(!tmp.path().join("logs").exists());
    }

    #[test]
    fn enabled_logging_creates_directory_and_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let log = TranscriptLog::new(tmp.path().join("logs").join("conversations.log"));

        assert!(log.log_turn("first question", "first answer", &logging_on()).unwrap());
        assert!(log.log_turn("second question", "second answer", &logging_on()).unwrap());

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            format!(
                "{}{}",
                format_entry("first question", "first answer"),
                format_entry("second question", "second answer")
            )
        );
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the log directory should be.
        let blocker = tmp.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();
        let log = TranscriptLog::new(blocker.join("conversations.log"));

        let err = log.log_turn("q", "a", &logging_on()).unwrap_err();
        assert!(matches!(err, TranscriptError::CreateDir { .. }));
    }
}
