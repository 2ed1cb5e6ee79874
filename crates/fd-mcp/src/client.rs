// SPDX-License-Identifier: MIT OR Apache-2.0
//! The MCP request layer: handshake, `tools/list`, `tools/call`.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};

use fd_core::ToolDef;

use super::{McpError, McpProcess, ServerSpec};

/// MCP protocol revision this client negotiates.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// A connected MCP client.
///
/// Requests carry monotonically increasing ids; responses are matched by id
/// and unrelated server notifications are skipped.
#[derive(Debug)]
pub struct McpClient {
    process: McpProcess,
    next_id: i64,
}

/// Output of one `tools/call` invocation: the concatenated text blocks and
/// the server's error flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Text content returned by the tool, blocks joined with newlines.
    pub text: String,
    /// Whether the server flagged the result as an error.
    pub is_error: bool,
}

#[derive(Deserialize)]
struct WireTool {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "inputSchema", default)]
    input_schema: Value,
}

#[derive(Deserialize)]
struct WireToolsList {
    #[serde(default)]
    tools: Vec<WireTool>,
}

#[derive(Deserialize)]
struct WireContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct WireCallResult {
    #[serde(default)]
    content: Vec<WireContentBlock>,
    #[serde(rename = "isError", default)]
    is_error: bool,
}

impl McpClient {
    /// Spawn the server described by `spec` and perform the initialize
    /// handshake.
    pub async fn connect(spec: &ServerSpec) -> Result<Self, McpError> {
        let process = McpProcess::spawn(spec).await?;
        let mut client = Self {
            process,
            next_id: 1,
        };
        client.initialize().await?;
        Ok(client)
    }

    async fn initialize(&mut self) -> Result<(), McpError> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "clientInfo": {
                        "name": "formdesk",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;
        debug!(
            server = %result
                .pointer("/serverInfo/name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown"),
            "tool server initialized"
        );

        // Handshake completes with a fire-and-forget notification.
        self.process
            .send(&json!({
                "jsonrpc": "2.0",
                "method": "notifications/initialized",
            }))
            .await
    }

    /// Fetch the server's tool definitions.
    ///
    /// Schemas come back exactly as declared by the server; normalization for
    /// the model provider happens downstream.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDef>, McpError> {
        let result = self.request("tools/list", json!({})).await?;
        let list: WireToolsList =
            serde_json::from_value(result).map_err(|e| McpError::Decode(e.to_string()))?;
        debug!(count = list.tools.len(), "listed tools");
        Ok(list
            .tools
            .into_iter()
            .map(|t| ToolDef::new(t.name, t.description, t.input_schema))
            .collect())
    }

    /// Invoke a tool by name with the given arguments.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolOutput, McpError> {
        let result = self
            .request(
                "tools/call",
                json!({"name": name, "arguments": arguments}),
            )
            .await?;
        let call: WireCallResult =
            serde_json::from_value(result).map_err(|e| McpError::Decode(e.to_string()))?;
        let text = call
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolOutput {
            text,
            is_error: call.is_error,
        })
    }

    /// Shut the server down.
    pub async fn close(&mut self) {
        self.process.kill().await;
    }

    /// Send one request and wait for the response with the matching id.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        let req = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(%method, id, "sending request");
        self.process.send(&req).await?;

        loop {
            let Some(msg) = self.process.recv().await? else {
                return Err(McpError::ServerClosed);
            };
            if msg.get("id") != Some(&json!(id)) {
                // Notification or a response to someone else; skip.
                trace!("skipping unrelated message");
                continue;
            }
            if let Some(err) = msg.get("error") {
                return Err(McpError::Rpc {
                    code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                    message: err
                        .get("message")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                });
            }
            return msg
                .get("result")
                .cloned()
                .ok_or_else(|| McpError::Protocol("response without result".into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_tool_maps_input_schema() {
        let list: WireToolsList = serde_json::from_value(json!({
            "tools": [
                {
                    "name": "get_record",
                    "description": "Fetch a record",
                    "inputSchema": {"type": "object", "properties": {"app_id": {"type": "number"}}},
                },
                {"name": "bare"},
            ]
        }))
        .unwrap();
        assert_eq!(list.tools.len(), 2);
        assert_eq!(list.tools[0].name, "get_record");
        assert_eq!(
            list.tools[0].input_schema["properties"]["app_id"]["type"],
            json!("number")
        );
        // Missing fields default rather than fail: the server's shape is not ours to control.
        assert_eq!(list.tools[1].description, "");
        assert_eq!(list.tools[1].input_schema, Value::Null);
    }

    #[test]
    fn call_result_joins_text_blocks() {
        let call: WireCallResult = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "line one"},
                {"type": "image", "data": "ignored"},
                {"type": "text", "text": "line two"},
            ],
            "isError": false,
        }))
        .unwrap();
        let text = call
            .content
            .iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(text, "line one\nline two");
        assert!(!call.is_error);
    }
}
