//! Completion API clients for docchat.
//!
//! All clients implement the `docchat_core::Provider` trait. The session only
//! ever sees `Arc<dyn Provider>`, so tests swap in scripted providers.

pub mod gemini;

pub use gemini::GeminiProvider;

use std::time::Duration;

use docchat_config::{ApiKey, Settings};
use docchat_core::ProviderError;

/// Build the configured completion client.
pub fn build_from_settings(
    settings: &Settings,
    api_key: ApiKey,
) -> Result<GeminiProvider, ProviderError> {
    GeminiProvider::new(api_key, Duration::from_secs(settings.request_timeout_secs))
}
