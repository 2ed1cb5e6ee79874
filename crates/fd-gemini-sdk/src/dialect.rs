// SPDX-License-Identifier: MIT OR Apache-2.0
//! Google Gemini `generateContent` wire types.

use serde::{Deserialize, Serialize};

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// A content block in the Gemini API format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiContent {
    /// Role of the content author (`user` or `model`).
    pub role: String,
    /// Content parts.
    pub parts: Vec<GeminiPart>,
}

/// Inline binary data (e.g. an uploaded PDF) embedded in a content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    /// MIME type of the data (e.g. `application/pdf`).
    pub mime_type: String,
    /// Base64-encoded binary data.
    pub data: String,
}

/// A document referenced by URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeminiFileData {
    /// MIME type, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// URI of the file.
    pub file_uri: String,
}

/// A part within a Gemini content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum GeminiPart {
    /// Plain text content.
    Text(String),
    /// Inline binary data.
    InlineData(GeminiInlineData),
    /// A file referenced by URI.
    FileData(GeminiFileData),
    /// A function call requested by the model.
    FunctionCall {
        /// Name of the function to invoke.
        name: String,
        /// Arguments as a JSON value.
        args: serde_json::Value,
    },
    /// A function response returned to the model.
    FunctionResponse {
        /// Name of the function that was called.
        name: String,
        /// The function's response payload (an object).
        response: serde_json::Value,
    },
}

/// Gemini-style function declaration.
///
/// `parameters` must already be acceptable to the provider — run tool-server
/// schemas through `fd-schema` before declaring them here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    /// Function name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the function parameters.
    pub parameters: serde_json::Value,
}

/// A tool entry in a request: a batch of function declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeminiToolDecl {
    /// Declared functions.
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// Generation parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Maximum number of output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A `generateContent` request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation content blocks.
    pub contents: Vec<GeminiContent>,
    /// Optional system instruction content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    /// Tool declarations available to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiToolDecl>>,
    /// Generation configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A `generateContent` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Response candidates.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token usage metadata.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// The generated content. Absent on fully filtered candidates.
    #[serde(default)]
    pub content: Option<GeminiContent>,
    /// Reason the model stopped (e.g. `STOP`).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage counters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    /// Tokens across candidates.
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
    /// Total tokens.
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Content of the first candidate, if any.
    #[must_use]
    pub fn first_content(&self) -> Option<&GeminiContent> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }

    /// Concatenated text parts of the first candidate.
    #[must_use]
    pub fn first_text(&self) -> Option<String> {
        let content = self.first_content()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| match p {
                GeminiPart::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// All function calls in the first candidate, in order.
    #[must_use]
    pub fn function_calls(&self) -> Vec<(&str, &serde_json::Value)> {
        self.first_content()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| match p {
                        GeminiPart::FunctionCall { name, args } => Some((name.as_str(), args)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_serialize_to_the_camel_case_wire_shape() {
        let text = serde_json::to_value(GeminiPart::Text("hi".into())).unwrap();
        assert_eq!(text, json!({"text": "hi"}));

        let call = serde_json::to_value(GeminiPart::FunctionCall {
            name: "get_record".into(),
            args: json!({"app_id": 1}),
        })
        .unwrap();
        assert_eq!(
            call,
            json!({"functionCall": {"name": "get_record", "args": {"app_id": 1}}})
        );

        let inline = serde_json::to_value(GeminiPart::InlineData(GeminiInlineData {
            mime_type: "application/pdf".into(),
            data: "QUJD".into(),
        }))
        .unwrap();
        assert_eq!(
            inline,
            json!({"inlineData": {"mimeType": "application/pdf", "data": "QUJD"}})
        );

        let file = serde_json::to_value(GeminiPart::FileData(GeminiFileData {
            mime_type: None,
            file_uri: "https://example.com/doc.pdf".into(),
        }))
        .unwrap();
        assert_eq!(
            file,
            json!({"fileData": {"fileUri": "https://example.com/doc.pdf"}})
        );
    }

    #[test]
    fn request_omits_absent_optionals() {
        let req = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user".into(),
                parts: vec![GeminiPart::Text("hello".into())],
            }],
            ..Default::default()
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("systemInstruction").is_none());
        assert!(v.get("tools").is_none());
        assert_eq!(v["contents"][0]["role"], "user");
    }

    #[test]
    fn response_parses_function_call_candidate() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "add_record", "args": {"app_id": 3}}}],
                },
                "finishReason": "STOP",
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15},
        }))
        .unwrap();
        let calls = resp.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "add_record");
        assert_eq!(resp.first_text(), None);
        assert_eq!(resp.usage_metadata.unwrap().total_token_count, Some(15));
    }

    #[test]
    fn response_without_candidates_is_tolerated() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.first_text().is_none());
        assert!(resp.function_calls().is_empty());
    }
}
