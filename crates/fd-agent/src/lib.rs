// SPDX-License-Identifier: MIT OR Apache-2.0
//! # fd-agent
//!
//! The agent runtime: a [`ToolRegistry`] of MCP-backed and native tools, an
//! in-memory [`MemorySaver`] checkpointer, and [`Agent`] — the streaming
//! tool-calling loop that drives Gemini across turns until it answers in
//! plain text.

#![deny(unsafe_code)]

mod registry;
mod saver;
mod tools;

pub use registry::{ToolHandler, ToolRegistry};
pub use saver::MemorySaver;
pub use tools::{ExtractFromFile, ExtractFromUrl, McpTool};

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use fd_core::{AgentEvent, Content};
use fd_gemini_sdk::{GeminiClient, GeminiError, GenerateContentRequest, lowering};
use fd_mcp::{McpClient, McpError};
use fd_schema::{normalize_tools, retain_invocable};
use serde_json::{Value, json};

/// Errors from registering or invoking tools and from driving the loop.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A tool name was dispatched that no handler claims.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Two handlers were registered under the same name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    /// The model supplied arguments the tool cannot use.
    #[error("invalid arguments for '{name}': {message}")]
    InvalidArguments {
        /// Tool name.
        name: String,
        /// What was wrong.
        message: String,
    },

    /// The tool ran and reported failure.
    #[error("tool '{name}' failed: {message}")]
    ToolFailed {
        /// Tool name.
        name: String,
        /// Failure detail from the tool.
        message: String,
    },

    /// Talking to the tool server failed.
    #[error(transparent)]
    Mcp(#[from] McpError),

    /// Talking to the model provider failed.
    #[error(transparent)]
    Gemini(#[from] GeminiError),
}

/// Operator prompt used when the caller does not supply one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a capable agent that processes business forms \
according to the user's instructions.\n\
Use the given tools appropriately to meet the user's expectations. Decide for yourself which \
tools to use and how many times to use them.\n\n\
Notes:\n\
1) Before entering data into the system, first fetch existing records to check which fields \
the app has and what input format each field expects. Build the record-insertion request from \
the extracted delivery information based on what you find.";

/// Turn cap used when the caller does not supply one.
pub const DEFAULT_MAX_TURNS: u32 = 16;

/// Fetch the tool server's definitions, normalize their schemas, drop the
/// provider-incompatible names, and register what survives.
///
/// This is the once-per-tool boundary fix: downstream of this call every
/// declared schema is provider-safe.
pub async fn wire_mcp_tools(
    registry: &mut ToolRegistry,
    client: Arc<Mutex<McpClient>>,
    excluded: &[&str],
) -> Result<usize, AgentError> {
    let listed = client.lock().await.list_tools().await?;
    let total = listed.len();
    let invocable = retain_invocable(normalize_tools(&listed), excluded);
    let kept = invocable.len();
    info!(total, kept, "wiring MCP tools");

    for def in invocable {
        registry.register(Arc::new(McpTool::new(client.clone(), def)))?;
    }
    Ok(kept)
}

/// A configured agent: model access, tools, checkpointing, and the loop
/// parameters.
pub struct Agent {
    gemini: GeminiClient,
    model: String,
    registry: Arc<ToolRegistry>,
    saver: MemorySaver,
    system_prompt: String,
    max_turns: u32,
}

impl Agent {
    /// Create an agent with the default system prompt and turn cap.
    pub fn new(
        gemini: GeminiClient,
        model: impl Into<String>,
        registry: Arc<ToolRegistry>,
        saver: MemorySaver,
    ) -> Self {
        Self {
            gemini,
            model: model.into(),
            registry,
            saver,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Replace the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Replace the turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Run one user instruction on a thread, streaming events as they occur.
    ///
    /// History for the thread is restored from the saver, extended as the
    /// loop progresses, and checkpointed after every model turn — so a
    /// follow-up instruction on the same thread sees everything that came
    /// before.
    pub fn run(&self, thread_id: &str, user_text: &str) -> ReceiverStream<AgentEvent> {
        let (tx, rx) = mpsc::channel(32);

        let gemini = self.gemini.clone();
        let model = self.model.clone();
        let registry = self.registry.clone();
        let saver = self.saver.clone();
        let system_prompt = self.system_prompt.clone();
        let max_turns = self.max_turns;
        let thread_id = thread_id.to_string();
        let user_text = user_text.to_string();

        tokio::spawn(async move {
            run_loop(
                gemini,
                model,
                registry,
                saver,
                system_prompt,
                max_turns,
                thread_id,
                user_text,
                tx,
            )
            .await;
        });

        ReceiverStream::new(rx)
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_loop(
    gemini: GeminiClient,
    model: String,
    registry: Arc<ToolRegistry>,
    saver: MemorySaver,
    system_prompt: String,
    max_turns: u32,
    thread_id: String,
    user_text: String,
    tx: mpsc::Sender<AgentEvent>,
) {
    // A dropped receiver ends the run; there is no one left to report to.
    macro_rules! emit {
        ($ev:expr) => {
            if tx.send($ev).await.is_err() {
                return;
            }
        };
    }

    let mut history = saver.load(&thread_id);
    history.push(Content::user_text(&user_text));
    debug!(%thread_id, prior = history.len() - 1, "run starting");
    emit!(AgentEvent::RunStarted {
        thread_id: thread_id.clone(),
    });

    let declarations = lowering::tool_declarations(&registry.definitions());
    let system = lowering::system_instruction(&system_prompt);
    let mut turns = 0u32;

    loop {
        if turns >= max_turns {
            warn!(%thread_id, max_turns, "turn limit reached");
            emit!(AgentEvent::Error {
                message: format!("turn limit of {max_turns} reached"),
            });
            return;
        }
        turns += 1;

        let request = GenerateContentRequest {
            contents: lowering::to_wire(&history),
            system_instruction: Some(system.clone()),
            tools: declarations.clone(),
            generation_config: None,
        };

        let response = match gemini.generate(&model, &request).await {
            Ok(r) => r,
            Err(e) => {
                emit!(AgentEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };

        let Some(content) = response.first_content() else {
            emit!(AgentEvent::Error {
                message: "model returned no content".to_string(),
            });
            return;
        };

        let reply = lowering::from_wire(content);
        history.push(reply.clone());
        saver.save(&thread_id, history.clone());

        let calls: Vec<(String, Value)> = reply
            .function_calls()
            .into_iter()
            .map(|(name, args)| (name.to_string(), args.clone()))
            .collect();

        if calls.is_empty() {
            emit!(AgentEvent::AssistantMessage {
                text: reply.text_content(),
            });
            emit!(AgentEvent::RunCompleted { turns });
            return;
        }

        let mut results = Vec::with_capacity(calls.len());
        for (name, args) in calls {
            emit!(AgentEvent::ToolCall {
                tool_name: name.clone(),
                input: args.clone(),
            });
            match registry.dispatch(&name, args).await {
                Ok(output) => {
                    emit!(AgentEvent::ToolResult {
                        tool_name: name.clone(),
                        output: output.clone(),
                        is_error: false,
                    });
                    results.push((name, json!({"result": output})));
                }
                Err(e) => {
                    // Feed the failure back so the model can adjust course.
                    let message = e.to_string();
                    warn!(tool = %name, %message, "tool invocation failed");
                    emit!(AgentEvent::ToolResult {
                        tool_name: name.clone(),
                        output: message.clone(),
                        is_error: true,
                    });
                    results.push((name, json!({"error": message})));
                }
            }
        }

        history.push(Content::function_responses(results));
        saver.save(&thread_id, history.clone());
    }
}
