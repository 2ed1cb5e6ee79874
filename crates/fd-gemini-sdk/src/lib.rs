// SPDX-License-Identifier: MIT OR Apache-2.0
//! # fd-gemini-sdk
//!
//! Google Gemini `generateContent` adapter: wire types ([`dialect`]),
//! lowering from the formdesk conversation types ([`lowering`]), the HTTP
//! client ([`GeminiClient`]), and document extraction ([`extract`]).

#![deny(unsafe_code)]

pub mod dialect;
pub mod extract;
pub mod lowering;

pub use dialect::{
    DEFAULT_MODEL, FunctionDeclaration, GeminiContent, GeminiPart, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig,
};

use serde_json::Value;
use tracing::debug;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Errors from the Gemini adapter.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The `GOOGLE_API_KEY` environment variable is unset or empty.
    #[error("missing API key: set {API_KEY_ENV}")]
    MissingApiKey,

    /// Transport-level HTTP failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body when unparsable.
        message: String,
    },

    /// The model returned no usable content.
    #[error("model returned no content")]
    EmptyResponse,

    /// Reading a local document failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, GeminiError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(GeminiError::MissingApiKey),
        }
    }

    /// Override the base URL (tests point this at a local fake).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Call `models/{model}:generateContent`.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        debug!(%model, contents = request.contents.len(), "generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(String::from)
                })
                .unwrap_or(body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
