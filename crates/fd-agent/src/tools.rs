// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tool handlers: MCP-backed tools and the native document-extraction pair.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use fd_core::ToolDef;
use fd_gemini_sdk::{GeminiClient, extract};
use fd_mcp::McpClient;
use serde_json::{Value, json};

use super::AgentError;
use super::registry::ToolHandler;

// ── MCP-backed tools ────────────────────────────────────────────────────

/// A tool that forwards invocations to a connected MCP server.
///
/// Carries the *normalized* definition; the raw server schema never reaches
/// the model.
pub struct McpTool {
    client: Arc<Mutex<McpClient>>,
    def: ToolDef,
}

impl McpTool {
    /// Wrap a normalized definition around a shared client handle.
    pub fn new(client: Arc<Mutex<McpClient>>, def: ToolDef) -> Self {
        Self { client, def }
    }
}

#[async_trait]
impl ToolHandler for McpTool {
    fn definition(&self) -> &ToolDef {
        &self.def
    }

    async fn invoke(&self, args: Value) -> Result<String, AgentError> {
        debug!(tool = %self.def.name, "invoking MCP tool");
        let output = self
            .client
            .lock()
            .await
            .call_tool(&self.def.name, args)
            .await?;
        if output.is_error {
            return Err(AgentError::ToolFailed {
                name: self.def.name.clone(),
                message: output.text,
            });
        }
        Ok(output.text)
    }
}

// ── Native extraction tools ─────────────────────────────────────────────

fn string_arg(args: &Value, key: &str, tool: &str) -> Result<String, AgentError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| AgentError::InvalidArguments {
            name: tool.to_string(),
            message: format!("missing required string argument '{key}'"),
        })
}

/// Extract business information as JSON from a file on the local disk.
pub struct ExtractFromFile {
    gemini: GeminiClient,
    model: String,
    def: ToolDef,
}

impl ExtractFromFile {
    /// Name this tool is registered and declared under.
    pub const NAME: &str = "extract_business_info_from_local_file";

    /// Create the handler around a Gemini client and model.
    pub fn new(gemini: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            gemini,
            model: model.into(),
            def: ToolDef::new(
                Self::NAME,
                "Extract business information as JSON from the local file.",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Path for the local file"},
                    },
                    "required": ["path"],
                }),
            ),
        }
    }
}

#[async_trait]
impl ToolHandler for ExtractFromFile {
    fn definition(&self) -> &ToolDef {
        &self.def
    }

    async fn invoke(&self, args: Value) -> Result<String, AgentError> {
        let path = string_arg(&args, "path", Self::NAME)?;
        debug!(%path, "extracting from local file");
        Ok(extract::document_json_from_file(&self.gemini, &self.model, &path).await?)
    }
}

/// Extract business information as JSON from a file at a URL.
pub struct ExtractFromUrl {
    gemini: GeminiClient,
    model: String,
    def: ToolDef,
}

impl ExtractFromUrl {
    /// Name this tool is registered and declared under.
    pub const NAME: &str = "extract_business_info_from_url";

    /// Create the handler around a Gemini client and model.
    pub fn new(gemini: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            gemini,
            model: model.into(),
            def: ToolDef::new(
                Self::NAME,
                "Extract business information as JSON from the file at the URL.",
                json!({
                    "type": "object",
                    "properties": {
                        "url": {"type": "string", "description": "URL for the file"},
                    },
                    "required": ["url"],
                }),
            ),
        }
    }
}

#[async_trait]
impl ToolHandler for ExtractFromUrl {
    fn definition(&self) -> &ToolDef {
        &self.def
    }

    async fn invoke(&self, args: Value) -> Result<String, AgentError> {
        let url = string_arg(&args, "url", Self::NAME)?;
        debug!(%url, "extracting from URL");
        Ok(extract::document_json_from_url(&self.gemini, &self.model, &url).await?)
    }
}
