//! Gemini provider implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use docslide_core::defaults::{ENV_AI_KEY, ENV_AI_MODEL, GEMINI_MODEL, GEMINI_URL, GEN_TIMEOUT_SECS};
use docslide_core::{Envelope, Error, Operation, Payload, Result};

use super::types::*;
use crate::provider::DocumentProvider;
use crate::providers::status_error;
use crate::validator::OutputValidator;

const PROVIDER_NAME: &str = "gemini";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the REST API (up to and including the version segment).
    pub base_url: String,
    /// API key; requests fail with a configuration error when absent.
    pub api_key: Option<String>,
    /// Model used for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: GEMINI_URL.to_string(),
            api_key: None,
            model: GEMINI_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Read configuration from environment variables.
    ///
    /// - `AI_KEY`: API key
    /// - `AI_MODEL` (default: gemini-1.5-flash)
    /// - `GEMINI_BASE_URL` (default: public v1beta endpoint)
    /// - `AI_TIMEOUT` seconds (default: 120)
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| GEMINI_URL.to_string()),
            api_key: std::env::var(ENV_AI_KEY).ok().filter(|k| !k.trim().is_empty()),
            model: std::env::var(ENV_AI_MODEL).unwrap_or_else(|_| GEMINI_MODEL.to_string()),
            timeout_seconds: std::env::var("AI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEN_TIMEOUT_SECS),
        }
    }
}

/// Provider backed by Gemini's `generateContent` endpoint.
///
/// All three operations send the same request shape: the uploaded file as
/// inline data followed by the prompt. The operation only decides which
/// schema the answer is validated against.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    validator: OutputValidator,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(config: GeminiConfig, validator: OutputValidator) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            configured = config.api_key.is_some(),
            "Initializing Gemini provider"
        );

        Ok(Self {
            client,
            config,
            validator,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_parts(payload: &Payload) -> Vec<Part> {
        let mut parts = Vec::new();
        if let Some(file) = payload.file.as_ref().filter(|f| !f.bytes.is_empty()) {
            let data = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
            parts.push(Part::inline(file.mime_type.clone(), data));
        }
        if !payload.prompt.is_empty() {
            parts.push(Part::text(payload.prompt.clone()));
        }
        parts
    }

    async fn generate(&self, operation: Operation, payload: &Payload) -> Result<Envelope> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not configured.", ENV_AI_KEY)))?;

        let parts = Self::build_parts(payload);
        if parts.is_empty() {
            return Err(Error::InvalidInput(
                "Gemini payload requires either a prompt or file.".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                temperature: None,
            }),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        debug!(
            provider = PROVIDER_NAME,
            op = %operation,
            model = %self.config.model,
            prompt_len = payload.prompt.len(),
            "Sending generateContent request"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<GeminiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = status_error(PROVIDER_NAME, status, &message);
            error!(provider = PROVIDER_NAME, op = %operation, error = %err, "Operation failed");
            return Err(err);
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse Gemini response: {}", e)))?;

        let text = result.text();
        if text.trim().is_empty() {
            return Err(Error::Provider("Gemini returned an empty response.".to_string()));
        }

        let response_len = text.len();
        let schema = payload.schema_type.unwrap_or_else(|| operation.schema());
        let validated = self.validator.validate_as(schema, Value::String(text))?;
        let tokens_used = result.total_tokens();

        debug!(
            provider = PROVIDER_NAME,
            op = %operation,
            duration_ms = started.elapsed().as_millis() as u64,
            response_len,
            tokens_used = ?tokens_used,
            "Generation complete"
        );

        Ok(Envelope::success(PROVIDER_NAME, validated.data, tokens_used))
    }
}

#[async_trait]
impl DocumentProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn analyze_pdf(&self, payload: &Payload) -> Result<Envelope> {
        self.generate(Operation::AnalyzePdf, payload).await
    }

    async fn summarize(&self, payload: &Payload) -> Result<Envelope> {
        self.generate(Operation::Summarize, payload).await
    }

    async fn extract_sections(&self, payload: &Payload) -> Result<Envelope> {
        self.generate(Operation::ExtractSections, payload).await
    }
}
