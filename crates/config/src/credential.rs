//! API key resolution.
//!
//! The key is looked up once at startup: first in the secrets store
//! (`config/secrets.toml`), then in the environment. A missing key is the
//! only fatal configuration problem.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::ConfigError;
use crate::paths::WorkspacePaths;

/// Name of the key in the secrets file and in the environment.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// The completion API credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key. Blank strings are not keys.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GOOGLE_API_KEY", default)]
    google_api_key: Option<String>,
}

/// Resolve the API key from the secrets file, falling back to the environment.
pub fn resolve_api_key(paths: &WorkspacePaths) -> Result<ApiKey, ConfigError> {
    let secrets_path = paths.secrets_file();
    let env_value = std::env::var(API_KEY_VAR).ok();
    resolve_from(&secrets_path, env_value)
}

fn resolve_from(secrets_path: &Path, env_value: Option<String>) -> Result<ApiKey, ConfigError> {
    if let Some(key) = read_secrets_file(secrets_path) {
        debug!(path = %secrets_path.display(), "API key resolved from secrets file");
        return Ok(key);
    }

    if let Some(key) = env_value.and_then(ApiKey::new) {
        debug!(var = API_KEY_VAR, "API key resolved from environment");
        return Ok(key);
    }

    Err(ConfigError::MissingCredential {
        var: API_KEY_VAR,
        secrets: secrets_path.to_path_buf(),
    })
}

fn read_secrets_file(path: &Path) -> Option<ApiKey> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<SecretsFile>(&content) {
        Ok(secrets) => secrets.google_api_key.and_then(ApiKey::new),
        Err(e) => {
            let err = ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            warn!("{err}");
            None
        }
    }
}
