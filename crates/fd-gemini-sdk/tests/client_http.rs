// SPDX-License-Identifier: MIT OR Apache-2.0
//! HTTP-surface tests against a wiremock fake of the Gemini API.

use std::io::Write;

use fd_gemini_sdk::{
    GeminiClient, GeminiError, GenerateContentRequest, dialect::GeminiContent,
    dialect::GeminiPart, extract,
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6},
    }))
}

#[tokio::test]
async fn generate_posts_to_the_model_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(text_response("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let request = GenerateContentRequest {
        contents: vec![GeminiContent {
            role: "user".into(),
            parts: vec![GeminiPart::Text("hi".into())],
        }],
        ..Default::default()
    };
    let response = client
        .generate("gemini-2.0-flash", &request)
        .await
        .expect("generate");
    assert_eq!(response.first_text().as_deref(), Some("hello"));
}

#[tokio::test]
async fn api_errors_surface_with_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "Invalid JSON payload", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let err = client
        .generate("gemini-2.0-flash", &GenerateContentRequest::default())
        .await
        .expect_err("must fail");
    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid JSON payload");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn file_extraction_sends_base64_inline_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("{\"customer\": \"Acme\"}"))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(b"%PDF-1.4 fake form").expect("write");

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let out = extract::document_json_from_file(&client, "gemini-2.0-flash", file.path())
        .await
        .expect("extract");
    assert_eq!(out, "{\"customer\": \"Acme\"}");

    let requests = server.received_requests().await.expect("requests");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("body json");
    let parts = &body["contents"][0]["parts"];
    // Instruction text first, document payload second.
    assert!(
        parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("extract the business information")
    );
    assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
    let encoded = parts[1]["inlineData"]["data"].as_str().unwrap();
    assert!(!encoded.is_empty());
    // No tools or system instruction on the extraction call.
    assert!(body.get("tools").is_none());
    assert!(body.get("systemInstruction").is_none());
}

#[tokio::test]
async fn url_extraction_sends_file_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("{}"))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    extract::document_json_from_url(&client, "gemini-2.0-flash", "https://example.com/form.pdf")
        .await
        .expect("extract");

    let requests = server.received_requests().await.expect("requests");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("body json");
    assert_eq!(
        body["contents"][0]["parts"][1]["fileData"]["fileUri"],
        "https://example.com/form.pdf"
    );
}

#[tokio::test]
async fn empty_candidates_map_to_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let err =
        extract::document_json_from_url(&client, "gemini-2.0-flash", "https://example.com/x.pdf")
            .await
            .expect_err("must fail");
    assert!(matches!(err, GeminiError::EmptyResponse));
}
