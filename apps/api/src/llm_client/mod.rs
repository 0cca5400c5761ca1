//! Model Gateway — the single point of entry for all LLM provider calls.
//!
//! ARCHITECTURAL RULE: no other module may call a provider API directly.
//! All LLM interactions MUST go through this module.
//!
//! The gateway performs NO retries: only the caller knows whether a failure
//! is a malformed-output case worth one more model call or a transport
//! failure worth surfacing immediately. Retry policy lives in the
//! orchestration layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Bounded wait per provider call. Exceeding it surfaces as the timeout
/// variant of `LlmError`, never a silent hang.
pub const REQUEST_TIMEOUT_SECS: u64 = 240;

/// Registry key of the model used when a request names none.
pub const DEFAULT_MODEL: &str = "gemini-3-pro";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Google,
}

/// One entry in the static model registry.
#[derive(Debug)]
pub struct ModelSpec {
    /// Registry key accepted in requests.
    pub key: &'static str,
    /// Provider-side model identifier.
    pub id: &'static str,
    pub display_name: &'static str,
    pub provider: Provider,
    pub max_tokens: u32,
    pub context_window: u32,
}

/// The models curriculum generation may run against. Adding a provider means
/// adding a variant to `Provider` and a normalization arm in `LlmClient`.
static MODEL_REGISTRY: &[ModelSpec] = &[
    ModelSpec {
        key: "claude-sonnet-4.5",
        id: "claude-sonnet-4-5-20250929",
        display_name: "Claude Sonnet 4.5",
        provider: Provider::Anthropic,
        max_tokens: 16_000,
        context_window: 200_000,
    },
    ModelSpec {
        key: "gemini-3-pro",
        id: "gemini-3-pro-preview",
        display_name: "Gemini 3.0 Pro",
        provider: Provider::Google,
        max_tokens: 16_000,
        context_window: 1_000_000,
    },
];

pub fn model_spec(key: &str) -> Option<&'static ModelSpec> {
    MODEL_REGISTRY.iter().find(|m| m.key == key)
}

pub fn model_keys() -> Vec<&'static str> {
    MODEL_REGISTRY.iter().map(|m| m.key).collect()
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Provider timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model '{model}' requires the {env} credential, which is not configured")]
    MissingCredential { model: String, env: String },

    #[error("Provider returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout {
                seconds: REQUEST_TIMEOUT_SECS,
            }
        } else {
            LlmError::Http(e)
        }
    }
}

/// Narrow seam over the LLM: `generate(prompt, system, model) → text`.
/// Substitutable by a test double returning canned text — orchestration tests
/// never touch the network.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        model_key: Option<&str>,
    ) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Provider wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn text(&self) -> Option<String> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.clone())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiTurn<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiTurn<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenates all text parts of the first candidate — long responses
    /// arrive split across parts.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let joined: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production gateway: normalizes provider-specific response shapes into
/// a single text payload.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    anthropic_api_key: Option<String>,
    gemini_api_key: Option<String>,
}

impl LlmClient {
    pub fn new(anthropic_api_key: Option<String>, gemini_api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            anthropic_api_key,
            gemini_api_key,
        }
    }

    fn resolve(&self, model_key: Option<&str>) -> Result<(&'static ModelSpec, &str), LlmError> {
        let key = model_key.unwrap_or(DEFAULT_MODEL);
        let spec = model_spec(key).ok_or_else(|| LlmError::UnknownModel(key.to_string()))?;
        let credential = match spec.provider {
            Provider::Anthropic => {
                self.anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| LlmError::MissingCredential {
                        model: key.to_string(),
                        env: "ANTHROPIC_API_KEY".to_string(),
                    })?
            }
            Provider::Google => {
                self.gemini_api_key
                    .as_deref()
                    .ok_or_else(|| LlmError::MissingCredential {
                        model: key.to_string(),
                        env: "GEMINI_API_KEY".to_string(),
                    })?
            }
        };
        Ok((spec, credential))
    }

    async fn call_anthropic(
        &self,
        spec: &ModelSpec,
        api_key: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: spec.id,
            max_tokens: spec.max_tokens,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnthropicResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }
        parsed.text().ok_or(LlmError::EmptyContent)
    }

    async fn call_gemini(
        &self,
        spec: &ModelSpec,
        api_key: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", spec.id);
        let request_body = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart { text: system }],
            },
            contents: vec![GeminiTurn {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: spec.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl ModelGateway for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        model_key: Option<&str>,
    ) -> Result<String, LlmError> {
        let (spec, credential) = self.resolve(model_key)?;
        // Rough token estimate (~4 chars/token). Oversized prompts are the
        // provider's error to report, but flag them early for operators.
        let approx_tokens = ((system.len() + prompt.len()) / 4) as u32;
        if approx_tokens > spec.context_window {
            warn!(
                "Prompt (~{approx_tokens} tokens) may exceed the {} context window of {}",
                spec.context_window, spec.display_name
            );
        }
        debug!(
            "Dispatching model call: {} ({} chars of prompt)",
            spec.key,
            prompt.len()
        );
        match spec.provider {
            Provider::Anthropic => self.call_anthropic(spec, credential, prompt, system).await,
            Provider::Google => self.call_gemini(spec, credential, prompt, system).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_default_model() {
        assert!(model_spec(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn test_registry_covers_two_providers() {
        let providers: Vec<Provider> = MODEL_REGISTRY.iter().map(|m| m.provider).collect();
        assert!(providers.contains(&Provider::Anthropic));
        assert!(providers.contains(&Provider::Google));
    }

    #[test]
    fn test_unknown_model_is_rejected_before_any_call() {
        let client = LlmClient::new(Some("key".into()), Some("key".into()));
        let err = client.resolve(Some("gpt-1")).unwrap_err();
        assert!(matches!(err, LlmError::UnknownModel(_)));
    }

    #[test]
    fn test_missing_credential_names_env_var() {
        let client = LlmClient::new(None, Some("key".into()));
        let err = client.resolve(Some("claude-sonnet-4.5")).unwrap_err();
        match err {
            LlmError::MissingCredential { env, .. } => assert_eq!(env, "ANTHROPIC_API_KEY"),
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_none_uses_default_model() {
        let client = LlmClient::new(Some("a".into()), Some("g".into()));
        let (spec, _) = client.resolve(None).unwrap();
        assert_eq!(spec.key, DEFAULT_MODEL);
    }

    #[test]
    fn test_anthropic_response_extracts_first_text_block() {
        let parsed: AnthropicResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "thinking", "text": null},
                    {"type": "text", "text": "{\"teacher_guide\": {}}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 5}
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("{\"teacher_guide\": {}}"));
    }

    #[test]
    fn test_gemini_response_joins_parts() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "{\"student_"}, {"text": "materials\": {}}"}]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("{\"student_materials\": {}}"));
    }

    #[test]
    fn test_gemini_empty_candidates_is_none() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(parsed.text().is_none());
    }
}
