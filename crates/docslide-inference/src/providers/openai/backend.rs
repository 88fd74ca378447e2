//! OpenAI-compatible provider implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use docslide_core::defaults::{GEN_TIMEOUT_SECS, OPENAI_GEN_MODEL, OPENAI_URL};
use docslide_core::{Envelope, Error, FilePart, Operation, Payload, Result};

use super::types::*;
use crate::provider::DocumentProvider;
use crate::providers::status_error;
use crate::validator::OutputValidator;

const PROVIDER_NAME: &str = "openai";

const SYSTEM_PROMPT: &str =
    "You are a document analysis assistant. Respond with a single JSON object and nothing else.";

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication. The registry only builds this provider
    /// when one is set.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_URL.to_string(),
            api_key: None,
            gen_model: OPENAI_GEN_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
        }
    }
}

impl OpenAIConfig {
    /// Read configuration from `OPENAI_BASE_URL`, `OPENAI_API_KEY`,
    /// `OPENAI_GEN_MODEL` and `OPENAI_TIMEOUT`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            gen_model: std::env::var("OPENAI_GEN_MODEL")
                .unwrap_or_else(|_| OPENAI_GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEN_TIMEOUT_SECS),
        }
    }
}

/// Provider backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
    validator: OutputValidator,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig, validator: OutputValidator) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.gen_model,
            "Initializing OpenAI provider"
        );

        Ok(Self {
            client,
            config,
            validator,
        })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req
    }

    fn file_part(file: &FilePart) -> ContentPart {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
        let data_uri = format!("data:{};base64,{}", file.mime_type, encoded);
        if file.mime_type.starts_with("image/") {
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: data_uri },
            }
        } else {
            ContentPart::File {
                file: FileData {
                    filename: file.file_name.clone(),
                    file_data: data_uri,
                },
            }
        }
    }

    fn build_parts(payload: &Payload) -> Vec<ContentPart> {
        let mut parts = Vec::new();
        if let Some(file) = payload.file.as_ref().filter(|f| !f.bytes.is_empty()) {
            parts.push(Self::file_part(file));
        }
        if !payload.prompt.is_empty() {
            parts.push(ContentPart::Text {
                text: payload.prompt.clone(),
            });
        }
        parts
    }

    async fn complete(&self, operation: Operation, payload: &Payload) -> Result<Envelope> {
        let parts = Self::build_parts(payload);
        if parts.is_empty() {
            return Err(Error::InvalidInput(
                "OpenAI payload requires either a prompt or file.".to_string(),
            ));
        }

        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(parts)],
            temperature: None,
            response_format: Some(ResponseFormat::json_object()),
        };

        debug!(
            provider = PROVIDER_NAME,
            op = %operation,
            model = %self.config.gen_model,
            prompt_len = payload.prompt.len(),
            "Sending chat completion request"
        );
        let started = Instant::now();

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<OpenAIErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = status_error(PROVIDER_NAME, status, &message);
            error!(provider = PROVIDER_NAME, op = %operation, error = %err, "Operation failed");
            return Err(err);
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse OpenAI response: {}", e)))?;

        let text = result.text();
        if text.trim().is_empty() {
            return Err(Error::Provider("OpenAI returned an empty response.".to_string()));
        }

        let response_len = text.len();
        let schema = payload.schema_type.unwrap_or_else(|| operation.schema());
        let validated = self.validator.validate_as(schema, Value::String(text))?;
        let tokens_used = result.usage.as_ref().map(|u| u.total_tokens);

        debug!(
            provider = PROVIDER_NAME,
            op = %operation,
            duration_ms = started.elapsed().as_millis() as u64,
            response_len,
            tokens_used = ?tokens_used,
            "Completion finished"
        );

        Ok(Envelope::success(PROVIDER_NAME, validated.data, tokens_used))
    }
}

#[async_trait]
impl DocumentProvider for OpenAIProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn analyze_pdf(&self, payload: &Payload) -> Result<Envelope> {
        self.complete(Operation::AnalyzePdf, payload).await
    }

    async fn summarize(&self, payload: &Payload) -> Result<Envelope> {
        self.complete(Operation::Summarize, payload).await
    }

    async fn extract_sections(&self, payload: &Payload) -> Result<Envelope> {
        self.complete(Operation::ExtractSections, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, OPENAI_URL);
        assert_eq!(config.gen_model, OPENAI_GEN_MODEL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_image_file_becomes_image_url() {
        let file = FilePart::new(vec![0xff], "scan.png", "image/png");
        match OpenAIProvider::file_part(&file) {
            ContentPart::ImageUrl { image_url } => {
                assert_eq!(image_url.url, "data:image/png;base64,/w==");
            }
            other => panic!("unexpected part: {:?}", other),
        }
    }

    #[test]
    fn test_document_file_becomes_file_part() {
        let file = FilePart::new(b"%PDF".to_vec(), "doc.pdf", "application/pdf");
        match OpenAIProvider::file_part(&file) {
            ContentPart::File { file } => {
                assert_eq!(file.filename, "doc.pdf");
                assert!(file.file_data.starts_with("data:application/pdf;base64,"));
            }
            other => panic!("unexpected part: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let config = OpenAIConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let provider = OpenAIProvider::new(config, OutputValidator::default()).unwrap();
        let err = provider
            .extract_sections(&Payload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
