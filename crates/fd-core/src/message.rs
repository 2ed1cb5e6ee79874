//! Conversation content: the provider-neutral message shape the agent keeps
//! as history and hands to the model adapter.

use serde::{Deserialize, Serialize};

/// Author of a [`Content`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The end user, tool results included.
    User,
    /// The model.
    Model,
}

/// One conversation turn: a role plus an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Author of this turn.
    pub role: Role,
    /// Ordered content parts.
    pub parts: Vec<Part>,
}

/// A single piece of a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    /// Plain text.
    Text {
        /// The text itself.
        text: String,
    },
    /// Inline binary data, base64-encoded (e.g. an uploaded PDF).
    InlineData {
        /// MIME type of the payload (e.g. `application/pdf`).
        mime_type: String,
        /// Base64-encoded bytes.
        data: String,
    },
    /// A document referenced by URI instead of carried inline.
    FileData {
        /// MIME type, when known.
        mime_type: Option<String>,
        /// Where the document lives.
        uri: String,
    },
    /// A tool invocation requested by the model.
    FunctionCall {
        /// Tool name.
        name: String,
        /// Arguments as a JSON value.
        args: serde_json::Value,
    },
    /// The result handed back for an earlier function call.
    FunctionResponse {
        /// Tool name the result belongs to.
        name: String,
        /// Result payload.
        response: serde_json::Value,
    },
}

impl Content {
    /// A user turn consisting of a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A model turn consisting of a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A user turn carrying one function response per `(name, payload)` pair.
    ///
    /// Function results travel back to the model under the user role.
    pub fn function_responses(results: Vec<(String, serde_json::Value)>) -> Self {
        Self {
            role: Role::User,
            parts: results
                .into_iter()
                .map(|(name, response)| Part::FunctionResponse { name, response })
                .collect(),
        }
    }

    /// Concatenation of all text parts in this turn.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// All function calls requested in this turn, in order.
    #[must_use]
    pub fn function_calls(&self) -> Vec<(&str, &serde_json::Value)> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionCall { name, args } => Some((name.as_str(), args)),
                _ => None,
            })
            .collect()
    }
}
