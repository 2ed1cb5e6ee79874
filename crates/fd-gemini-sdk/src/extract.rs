// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document extraction: hand the model a form and get structured JSON back.
//!
//! Two entry points mirror the two ways a document reaches the agent: a path
//! on the local disk (base64-encoded inline) or a URL the provider fetches
//! itself.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::path::Path;

use crate::dialect::{GeminiContent, GeminiFileData, GeminiInlineData, GeminiPart};
use crate::{GeminiClient, GeminiError, GenerateContentRequest};

/// Instruction sent alongside the document payload.
const EXTRACT_INSTRUCTION: &str = "Read the given document and extract the business information \
     as JSON. DON'T include any text other than JSON:";

/// MIME type assumed for uploaded forms.
pub const PDF_MIME: &str = "application/pdf";

/// Extract business information as JSON from a document on the local disk.
///
/// The file is read and base64-encoded into the request; no copy of it
/// leaves the process except inside the provider call.
pub async fn document_json_from_file(
    client: &GeminiClient,
    model: &str,
    path: impl AsRef<Path>,
) -> Result<String, GeminiError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let payload = GeminiPart::InlineData(GeminiInlineData {
        mime_type: PDF_MIME.to_string(),
        data: BASE64.encode(&bytes),
    });
    extract(client, model, payload).await
}

/// Extract business information as JSON from a document at a URL.
pub async fn document_json_from_url(
    client: &GeminiClient,
    model: &str,
    url: &str,
) -> Result<String, GeminiError> {
    let payload = GeminiPart::FileData(GeminiFileData {
        mime_type: Some(PDF_MIME.to_string()),
        file_uri: url.to_string(),
    });
    extract(client, model, payload).await
}

async fn extract(
    client: &GeminiClient,
    model: &str,
    payload: GeminiPart,
) -> Result<String, GeminiError> {
    let request = GenerateContentRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart::Text(EXTRACT_INSTRUCTION.to_string()), payload],
        }],
        ..Default::default()
    };
    let response = client.generate(model, &request).await?;
    response.first_text().ok_or(GeminiError::EmptyResponse)
}
