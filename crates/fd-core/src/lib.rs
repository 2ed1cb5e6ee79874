//! fd-core
//!
//! The stable contract for formdesk.
//!
//! Every other crate speaks in these types: tool definitions as they arrive
//! from the tool server, conversation content as it flows to and from the
//! model, and the events an agent run emits.

pub mod event;
pub mod message;

pub use event::AgentEvent;
pub use message::{Content, Part, Role};

use serde::{Deserialize, Serialize};

/// A callable capability an agent can invoke: a name, a human-readable
/// description, and a JSON-schema-shaped input schema.
///
/// Definitions originate from an external tool server, so the schema is kept
/// as an untyped [`serde_json::Value`] tree — its exact shape is not
/// controlled by this system and may change as the server evolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDef {
    /// Unique tool name, used for dispatch and filtering.
    pub name: String,

    /// Human-readable description shown to the model.
    #[serde(default)]
    pub description: String,

    /// JSON-schema fragment describing the tool's expected arguments.
    pub input_schema: serde_json::Value,
}

impl ToolDef {
    /// Create a tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Copy every field of this definition and override exactly the input
    /// schema.
    ///
    /// All non-schema fields are owned clones; the returned value aliases no
    /// mutable state of `self`.
    #[must_use]
    pub fn with_input_schema(&self, input_schema: serde_json::Value) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_input_schema_replaces_only_the_schema() {
        let def = ToolDef::new("get_record", "Fetch one record", json!({"type": "object"}));
        let swapped = def.with_input_schema(json!({"type": "object", "properties": {}}));

        assert_eq!(swapped.name, def.name);
        assert_eq!(swapped.description, def.description);
        assert_ne!(swapped.input_schema, def.input_schema);
        // The original is untouched.
        assert_eq!(def.input_schema, json!({"type": "object"}));
    }

    #[test]
    fn tool_def_description_defaults_on_deserialize() {
        let def: ToolDef =
            serde_json::from_value(json!({"name": "t", "input_schema": {}})).unwrap();
        assert_eq!(def.description, "");
    }
}
