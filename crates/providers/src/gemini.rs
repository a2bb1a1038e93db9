//! Google Gemini `generateContent` client.
//!
//! One POST per turn, no streaming, no retries. The assembled prompt is sent
//! as a single user part; temperature goes in `generationConfig`.

use std::time::Duration;

use async_trait::async_trait;
use docchat_config::ApiKey;
use docchat_core::ProviderError;
use docchat_core::provider::{Completion, CompletionRequest, Provider, Usage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini REST provider.
pub struct GeminiProvider {
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider whose every call is bounded by `timeout`.
    pub fn new(api_key: ApiKey, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            timeout,
            client,
        })
    }

    /// Override the API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn build_body(request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let url = self.endpoint(&request.model);
        let body = Self::build_body(&request);

        debug!(
            model = %request.model,
            temperature = request.temperature,
            prompt_chars = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(status_error(status, &request.model, &error_body));
        }

        let api_response: GenerateContentResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: status,
                message: format!("Failed to parse response: {e}"),
            })?;

        into_completion(api_response, &request.model)
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(format!("no response within {}s", timeout.as_secs()))
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Map a non-success HTTP status to the error taxonomy.
fn status_error(status: u16, model: &str, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(format!("{model}: {message}")),
        429 => ProviderError::RateLimited(message),
        _ => ProviderError::ApiError {
            status_code: status,
            message,
        },
    }
}

fn into_completion(
    response: GenerateContentResponse,
    requested_model: &str,
) -> Result<Completion, ProviderError> {
    let text: String = response
        .candidates
        .iter()
        .find_map(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {r}"))
            .or_else(|| {
                response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .map(|r| format!("no text returned (finish reason: {r})"))
            })
            .unwrap_or_else(|| "no candidates in response".into());
        return Err(ProviderError::ApiError {
            status_code: 200,
            message: reason,
        });
    }

    let usage = response.usage_metadata.map(|u| Usage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    Ok(Completion {
        text,
        model: response
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        usage,
    })
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
