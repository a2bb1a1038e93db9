//! Provider trait: the abstraction over the remote completion API.
//!
//! A Provider takes one fully assembled prompt and returns the generated
//! text. Assembly (system prompt, documents, history) happens before the
//! provider is called, so implementations stay thin.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// One completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gemini-1.5-pro")
    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// The assembled context sent as the prompt
    pub prompt: String,
}

/// A successful completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics, when the API reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The completion client seam.
///
/// The session awaits `complete()` once per turn. Errors are returned to the
/// caller untouched; implementations never retry.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;
}
