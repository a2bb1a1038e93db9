//! Bot settings: `config/settings.json` (or `.toml`).
//!
//! Parsing is per key. The file is read into a generic mapping, then each
//! recognized key is extracted on its own, so one bad value never discards
//! the others. Absent keys keep their defaults silently; keys with the wrong
//! type or an out-of-range value keep their defaults with a warning.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{ConfigError, Loaded};

pub const DEFAULT_BOT_NAME: &str = "AI Assistant";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Typed settings, immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name shown as the chat header
    pub bot_name: String,

    /// Sampling temperature, validated to [0, 1]
    pub temperature: f32,

    /// Model identifier passed to the completion API
    pub model: String,

    /// Mirror every turn into the transcript log
    pub enable_logging: bool,

    /// Upper bound on a single completion call
    pub request_timeout_secs: u64,

    /// Character budget for the assembled prompt. `None` = no truncation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_chars: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot_name: DEFAULT_BOT_NAME.into(),
            temperature: DEFAULT_TEMPERATURE,
            model: DEFAULT_MODEL.into(),
            enable_logging: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_context_chars: None,
        }
    }
}

impl Settings {
    /// Build settings from a parsed mapping, keeping defaults for anything
    /// absent or invalid.
    pub fn from_mapping(map: &Map<String, Value>) -> Loaded<Self> {
        let mut settings = Self::default();
        let mut warnings = Vec::new();

        for (key, value) in map {
            let outcome = match key.as_str() {
                "bot_name" => non_empty_str(value).map(|s| settings.bot_name = s),
                "model" => non_empty_str(value).map(|s| settings.model = s),
                "temperature" => temperature(value).map(|t| settings.temperature = t),
                "enable_logging" => value
                    .as_bool()
                    .map(|b| settings.enable_logging = b)
                    .ok_or_else(|| expected("a boolean", value)),
                "request_timeout_secs" => match value.as_u64() {
                    Some(secs) if secs > 0 => {
                        settings.request_timeout_secs = secs;
                        Ok(())
                    }
                    _ => Err(expected("a positive integer", value)),
                },
                "max_context_chars" => match value {
                    Value::Null => {
                        settings.max_context_chars = None;
                        Ok(())
                    }
                    _ => value
                        .as_u64()
                        .and_then(|n| usize::try_from(n).ok())
                        .map(|n| settings.max_context_chars = Some(n))
                        .ok_or_else(|| expected("a non-negative integer or null", value)),
                },
                other => {
                    debug!(key = other, "Ignoring unknown settings key");
                    Ok(())
                }
            };

            if let Err(reason) = outcome {
                let err = ConfigError::ValidationError(format!("`{key}` {reason}"));
                warn!("{err}; keeping default");
                warnings.push(format!("{err}. Using the default instead."));
            }
        }

        Loaded {
            value: settings,
            warnings,
        }
    }

    /// Pretty JSON for writing a starter settings file.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Load settings from `path`. Never fails: on any problem the defaults (plus
/// whatever keys did parse) are returned with warnings.
pub fn load_settings(path: &Path) -> Loaded<Settings> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let err = ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            warn!("{err}");
            return Loaded::degraded(
                Settings::default(),
                format!("Could not load configuration file. Using defaults. Error: {err}"),
            );
        }
    };

    let document = match parse_document(path, &content) {
        Ok(document) => document,
        Err(err) => {
            warn!("{err}");
            return Loaded::degraded(
                Settings::default(),
                format!("Could not load configuration file. Using defaults. Error: {err}"),
            );
        }
    };

    let Some(map) = document.as_object() else {
        let err = ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: format!("expected a mapping at the top level, found {}", kind(&document)),
        };
        warn!("{err}");
        return Loaded::degraded(
            Settings::default(),
            format!("Could not load configuration file. Using defaults. Error: {err}"),
        );
    };

    let loaded = Settings::from_mapping(map);
    debug!(path = %path.display(), settings = ?loaded.value, "Settings loaded");
    loaded
}

/// Parse JSON, or TOML when the file extension says so, into one generic value.
fn parse_document(path: &Path, content: &str) -> Result<Value, ConfigError> {
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str::<Value>(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason,
    })
}

fn non_empty_str(value: &Value) -> Result<String, String> {
    match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(expected("a non-empty string", value)),
    }
}

fn temperature(value: &Value) -> Result<f32, String> {
    let Some(t) = value.as_f64() else {
        return Err(expected("a number", value));
    };
    if t.is_finite() && (0.0..=1.0).contains(&t) {
        Ok(t as f32)
    } else {
        Err(format!("must be between 0.0 and 1.0, got {t}"))
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("must be {what}, got {}", kind(value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_returns_documented_defaults() {
        let loaded = load_settings(Path::new("/nonexistent/config/settings.json"));
        assert_eq!(
            loaded.value,
            Settings {
                bot_name: "AI Assistant".into(),
                temperature: 0.7,
                model: "gemini-1.5-pro".into(),
                enable_logging: false,
                request_timeout_secs: 120,
                max_context_chars: None,
            }
        );
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("Using defaults"));
    }

    #[test]
    fn full_json_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"bot_name": "Docs Helper", "temperature": 0.2, "model": "gemini-1.5-flash", "enable_logging": true}"#,
        )
        .unwrap();

        let loaded = load_settings(&path);
        assert!(loaded.is_clean());
        assert_eq!(loaded.value.bot_name, "Docs Helper");
        assert!((loaded.value.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(loaded.value.model, "gemini-1.5-flash");
        assert!(loaded.value.enable_logging);
    }

    #[test]
    fn partial_file_fills_absent_keys_with_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"bot_name": "Partial"}"#).unwrap();

        let loaded = load_settings(&path);
        assert!(loaded.is_clean());
        assert_eq!(loaded.value.bot_name, "Partial");
        assert_eq!(loaded.value.model, DEFAULT_MODEL);
        assert!(!loaded.value.enable_logging);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"bot_name": "Broken", "#).unwrap();

        let loaded = load_settings(&path);
        assert_eq!(loaded.value, Settings::default());
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn wrong_typed_key_keeps_default_but_others_survive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"bot_name": "Mixed", "temperature": "hot", "enable_logging": "yes"}"#,
        )
        .unwrap();

        let loaded = load_settings(&path);
        assert_eq!(loaded.value.bot_name, "Mixed");
        assert!((loaded.value.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!(!loaded.value.enable_logging);
        assert_eq!(loaded.warnings.len(), 2);
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let map = serde_json::json!({"temperature": 1.5});
        let loaded = Settings::from_mapping(map.as_object().unwrap());
        assert!((loaded.value.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("temperature"));
    }

    #[test]
    fn boundary_temperatures_accepted() {
        for t in [0.0, 1.0] {
            let map = serde_json::json!({ "temperature": t });
            let loaded = Settings::from_mapping(map.as_object().unwrap());
            assert!(loaded.is_clean());
            assert!((loaded.value.temperature - t as f32).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn unknown_keys_ignored() {
        let map = serde_json::json!({"theme": "dark", "model": "gemini-2.0-flash"});
        let loaded = Settings::from_mapping(map.as_object().unwrap());
        assert!(loaded.is_clean());
        assert_eq!(loaded.value.model, "gemini-2.0-flash");
    }

    #[test]
    fn non_mapping_document_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let loaded = load_settings(&path);
        assert_eq!(loaded.value, Settings::default());
        assert!(loaded.warnings[0].contains("mapping"));
    }

    #[test]
    fn toml_settings_supported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(
            &path,
            "bot_name = \"Toml Bot\"\ntemperature = 0.4\nmax_context_chars = 20000\n",
        )
        .unwrap();

        let loaded = load_settings(&path);
        assert!(loaded.is_clean());
        assert_eq!(loaded.value.bot_name, "Toml Bot");
        assert_eq!(loaded.value.max_context_chars, Some(20000));
    }

    #[test]
    fn zero_timeout_rejected() {
        let map = serde_json::json!({"request_timeout_secs": 0});
        let loaded = Settings::from_mapping(map.as_object().unwrap());
        assert_eq!(loaded.value.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn starter_json_roundtrips_through_loader() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, Settings::default().to_json_pretty().unwrap()).unwrap();

        let loaded = load_settings(&path);
        assert!(loaded.is_clean());
        assert_eq!(loaded.value, Settings::default());
    }
}
