// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed registry of the tools an agent may invoke.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use fd_core::ToolDef;
use serde_json::Value;

use super::AgentError;

/// A callable tool: its definition plus an invocation handler.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool's definition as declared to the model.
    fn definition(&self) -> &ToolDef;

    /// Invoke the tool with the model-supplied arguments.
    async fn invoke(&self, args: Value) -> Result<String, AgentError>;
}

/// Name-keyed registry preserving registration order.
///
/// Order matters: definitions are declared to the model in the order tools
/// were registered, which keeps declarations stable across runs.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Duplicate names are rejected.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), AgentError> {
        let name = handler.definition().name.clone();
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        self.index.insert(name, self.handlers.len());
        self.handlers.push(handler);
        Ok(())
    }

    /// Tool definitions in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.handlers
            .iter()
            .map(|h| h.definition().clone())
            .collect()
    }

    /// Registered tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers
            .iter()
            .map(|h| h.definition().name.as_str())
            .collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke a tool by name.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<String, AgentError> {
        let handler = self
            .index
            .get(name)
            .map(|&i| &self.handlers[i])
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;
        handler.invoke(args).await
    }
}
