//! Events emitted over the course of one agent run.

use serde::{Deserialize, Serialize};

/// A single event in an agent run's output stream.
///
/// Serialized with `#[serde(tag = "type")]` so consumers can match on the
/// discriminant without knowing every payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// The run has been accepted and history restored.
    RunStarted {
        /// Conversation thread the run belongs to.
        thread_id: String,
    },

    /// A complete assistant text message.
    AssistantMessage {
        /// The message text.
        text: String,
    },

    /// The model asked for a tool invocation.
    ToolCall {
        /// Tool name.
        tool_name: String,
        /// Arguments the model supplied.
        input: serde_json::Value,
    },

    /// A tool invocation finished.
    ToolResult {
        /// Tool name.
        tool_name: String,
        /// Raw tool output.
        output: String,
        /// Whether the tool reported failure.
        is_error: bool,
    },

    /// The run finished normally.
    RunCompleted {
        /// Number of model turns consumed.
        turns: u32,
    },

    /// The run aborted.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_tag_by_type() {
        let ev = AgentEvent::ToolCall {
            tool_name: "add_record".into(),
            input: json!({"app": 12}),
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["type"], "tool_call");
        assert_eq!(v["tool_name"], "add_record");

        let back: AgentEvent = serde_json::from_value(v).unwrap();
        assert_eq!(back, ev);
    }
}
