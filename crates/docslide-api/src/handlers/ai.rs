//! Document AI endpoint.
//!
//! Accepts a multipart form, prepares the text, renders the operation's
//! prompt and hands the payload to the orchestrator.

use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use docslide_core::{Envelope, FilePart, Operation, Payload, SchemaType};

use crate::ingestion::build_prompt_context;
use crate::templates::Template;
use crate::{ApiError, AppState};

/// How one wire operation name is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRoute {
    pub operation: Operation,
    pub schema: SchemaType,
    pub template: Template,
}

/// Look up the route for a wire operation name.
///
/// `pdfAnalysis` is accepted as an alias of `analyzePDF`.
pub fn route_for(name: &str) -> Option<OperationRoute> {
    let operation: Operation = name.parse().ok()?;
    let template = match operation {
        Operation::AnalyzePdf => Template::PdfAnalysis,
        Operation::Summarize => Template::DocumentExplanation,
        Operation::ExtractSections => Template::SectionExtraction,
    };
    Some(OperationRoute {
        operation,
        schema: operation.schema(),
        template,
    })
}

/// Parsed multipart form.
#[derive(Debug, Default)]
pub struct AiForm {
    pub operation: String,
    pub file: Option<FilePart>,
    pub text: String,
    pub question: Option<String>,
    pub insights: Option<String>,
    pub provider: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl AiForm {
    /// Read every field of `multipart`. Unknown fields are skipped.
    ///
    /// An over-limit body maps to [`ApiError::PayloadTooLarge`]; every other
    /// multipart failure is [`ApiError::Internal`].
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = AiForm::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(|n| n.to_string());
            match field_name.as_deref() {
                Some("file") => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let mime_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;
                    form.file = Some(FilePart::new(bytes.to_vec(), file_name, mime_type));
                }
                Some(name @ ("operation" | "text" | "question" | "insights" | "provider")) => {
                    let name = name.to_string();
                    let value = field.text().await?;
                    match name.as_str() {
                        "operation" => form.operation = value.trim().to_string(),
                        "text" => form.text = value,
                        "question" => form.question = non_blank(value),
                        "insights" => form.insights = non_blank(value),
                        _ => form.provider = non_blank(value),
                    }
                }
                _ => {
                    debug!(field = ?field_name, "Skipping unknown multipart field");
                }
            }
        }

        Ok(form)
    }
}

/// Build the provider payload for `form` served by `route`.
pub fn build_payload(form: AiForm, route: &OperationRoute) -> Payload {
    let ctx = build_prompt_context(&form.text, form.question, form.insights);
    let prompt = route.template.render(&ctx);

    let mut extras = serde_json::Map::new();
    if let Some(file) = &form.file {
        extras.insert(
            "metadata".to_string(),
            json!({
                "fileName": file.file_name,
                "mimeType": file.mime_type,
                "size": file.size,
            }),
        );
    }

    Payload {
        cleaned: ctx.cleaned,
        normalized: ctx.normalized,
        chunks: ctx.chunks,
        language: ctx.language,
        context: ctx.context,
        prompt,
        question: ctx.question,
        insights: ctx.insights,
        file: form.file,
        schema_type: Some(route.schema),
        operation: Some(route.operation),
        extras,
    }
}

/// `POST /api/ai`
///
/// # Returns
/// - 200 with the provider's envelope, data re-validated against the schema
/// - 400 with a `router` envelope for an unsupported operation
/// - 502 with the provider's failed envelope
/// - 413 with a `router` envelope when the body exceeds the limit
/// - 500 with a `router` envelope for malformed bodies or invalid data
pub async fn run_operation(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let mut form = AiForm::from_multipart(multipart?).await?;
    let route = route_for(&form.operation).ok_or_else(|| ApiError::unsupported(&form.operation))?;
    let provider = form.provider.take();

    let started = Instant::now();
    let payload = build_payload(form, &route);
    let envelope = state
        .orchestrator
        .execute(route.operation, &payload, provider.as_deref())
        .await;

    info!(
        op = %route.operation,
        provider = %envelope.provider,
        success = envelope.success,
        duration_ms = started.elapsed().as_millis() as u64,
        "AI request handled"
    );

    if !envelope.success {
        return Err(ApiError::Upstream(envelope));
    }

    let raw = envelope.data.clone().unwrap_or(Value::Null);
    let validated = state.validator.validate_as(route.schema, raw)?;

    Ok(Json(Envelope {
        data: Some(validated.data),
        ..envelope
    }))
}
