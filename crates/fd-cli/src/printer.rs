// SPDX-License-Identifier: MIT OR Apache-2.0
//! Console rendering for agent events.

use fd_core::AgentEvent;

const BANNER_WIDTH: usize = 72;

fn banner(title: &str) -> String {
    format!("{:=^BANNER_WIDTH$}", format!(" {title} "))
}

/// Render one event for the console, or `None` for events that stay silent.
pub fn render(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::RunStarted { .. } => None,
        AgentEvent::AssistantMessage { text } => {
            Some(format!("{}\n{text}\n", banner("Assistant")))
        }
        AgentEvent::ToolCall { tool_name, input } => {
            let args = serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());
            Some(format!("{}\n{tool_name} {args}\n", banner("Tool Call")))
        }
        AgentEvent::ToolResult {
            tool_name,
            output,
            is_error,
        } => {
            let title = if *is_error {
                "Tool Result (error)"
            } else {
                "Tool Result"
            };
            Some(format!("{}\n[{tool_name}] {output}\n", banner(title)))
        }
        AgentEvent::RunCompleted { turns } => {
            Some(format!("— run completed in {turns} turn(s)\n"))
        }
        AgentEvent::Error { message } => Some(format!("{}\n{message}\n", banner("Error"))),
    }
}
