//! Router-level tests for the AI endpoint using the mock provider.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use docslide_api::{router, AppState};
use docslide_core::Error;
use docslide_inference::mock::MockProvider;
use docslide_inference::{InferenceConfig, Orchestrator, OutputValidator, ProviderRegistry, RetryPolicy};

const BOUNDARY: &str = "docslide-test-boundary";
const BODY_LIMIT: usize = 1024 * 1024;

fn app_with(mocks: &[&MockProvider]) -> Router {
    let mut registry = ProviderRegistry::new("gemini");
    for mock in mocks {
        registry.register(Arc::new((*mock).clone()));
    }
    let orchestrator = Orchestrator::new(registry).with_retry_policy(RetryPolicy::none());
    router(AppState::new(orchestrator, OutputValidator::default()), BODY_LIMIT)
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, mime, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn ai_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = app_with(&[&MockProvider::new("gemini")]);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "provider": "gemini"}));
}

#[tokio::test]
async fn test_summarize_success() {
    let mock = MockProvider::new("gemini").with_response(json!({"summary": "Short", "answer": "Yes"}));
    let app = app_with(&[&mock]);

    let body = multipart_body(
        &[("operation", "summarize"), ("text", "Some  document\r\ntext"), ("question", "Is it short?")],
        None,
    );
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["tokensUsed"], 42);
    assert_eq!(body["data"], json!({"summary": "Short", "answer": "Yes"}));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("QUESTION:\nIs it short?"));
    assert!(calls[0].prompt.contains("Some document text"));
}

#[tokio::test]
async fn test_pdf_analysis_alias_with_file() {
    let mock = MockProvider::new("gemini");
    let app = app_with(&[&mock]);

    let body = multipart_body(
        &[("operation", "pdfAnalysis")],
        Some(("report.pdf", "application/pdf", b"%PDF-1.4 fake")),
    );
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["slides"].is_array());
    assert_eq!(mock.call_count_for(docslide_core::Operation::AnalyzePdf), 1);
}

#[tokio::test]
async fn test_unsupported_operation() {
    let mock = MockProvider::new("gemini");
    let app = app_with(&[&mock]);

    let (status, body) = send(app, ai_request(multipart_body(&[("operation", "translate")], None))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "data": {"error": "Unsupported operation \"translate\"."},
            "provider": "router"
        })
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_failed_envelope_is_bad_gateway() {
    let mock = MockProvider::new("gemini").with_error(Error::Config("AI_KEY is not configured.".into()));
    let app = app_with(&[&mock]);

    let body = multipart_body(&[("operation", "analyzePDF"), ("text", "t")], None);
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["provider"], "gemini");
    assert!(body["data"]["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_invalid_provider_data_is_internal_error() {
    let mock = MockProvider::new("gemini").with_response(json!({"slides": []}));
    let app = app_with(&[&mock]);

    let body = multipart_body(&[("operation", "analyzePDF"), ("text", "t")], None);
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["provider"], "router");
    assert!(body["data"]["error"]
        .as_str()
        .unwrap()
        .contains("Missing field \"summary\""));
}

#[tokio::test]
async fn test_provider_override() {
    let gemini = MockProvider::new("gemini");
    let claude = MockProvider::new("claude");
    let app = app_with(&[&gemini, &claude]);

    let body = multipart_body(
        &[("operation", "extractSections"), ("text", "t"), ("provider", "Claude")],
        None,
    );
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "claude");
    assert_eq!(gemini.call_count(), 0);
    assert_eq!(claude.call_count(), 1);
}

#[tokio::test]
async fn test_unconfigured_openai_extract_sections() {
    let orchestrator = Orchestrator::from_config(&InferenceConfig::default()).unwrap();
    let app = router(AppState::new(orchestrator, OutputValidator::default()), BODY_LIMIT);

    let body = multipart_body(
        &[("operation", "extractSections"), ("text", "t"), ("provider", "openai")],
        None,
    );
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({
            "success": false,
            "data": {"error": "[openai] extractSections is not configured yet."},
            "tokensUsed": null,
            "provider": "openai"
        })
    );
}

#[tokio::test]
async fn test_gemini_without_key_is_bad_gateway() {
    let config = InferenceConfig {
        retry: RetryPolicy::none(),
        ..InferenceConfig::default()
    };
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let app = router(AppState::new(orchestrator, OutputValidator::default()), BODY_LIMIT);

    let body = multipart_body(&[("operation", "summarize"), ("text", "Some text")], None);
    let (status, body) = send(app, ai_request(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["tokensUsed"], Value::Null);
    let message = body["data"]["error"].as_str().unwrap();
    assert!(message.contains("not configured"), "message: {message}");
}

#[tokio::test]
async fn test_truncated_multipart_is_internal_error() {
    let app = app_with(&[&MockProvider::new("gemini")]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"operation\"\r\n\r\nsumm"
        )))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["provider"], "router");
}

#[tokio::test]
async fn test_body_limit() {
    let app = app_with(&[&MockProvider::new("gemini")]);
    let big = vec![b'a'; BODY_LIMIT + 1];
    let body = multipart_body(&[("operation", "summarize")], Some(("big.bin", "application/octet-stream", &big)));

    let (status, body) = send(app, ai_request(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["provider"], "router");
    assert!(body["data"]["error"].is_string());
}

#[tokio::test]
async fn test_non_multipart_body_is_internal_error() {
    let mock = MockProvider::new("gemini");
    let app = app_with(&[&mock]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"operation":"summarize"}"#))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["provider"], "router");
    assert_eq!(body["tokensUsed"], Value::Null);
    assert!(body["data"]["error"].is_string());
    assert_eq!(mock.call_count(), 0);
}
