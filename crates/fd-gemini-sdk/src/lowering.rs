// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lowering between the formdesk conversation types and the Gemini wire
//! format.
//!
//! [`to_wire`] converts a slice of [`Content`]s into Gemini contents, and
//! [`from_wire`] converts a model reply back so it can be appended to the
//! conversation history.

use fd_core::{Content, Part, Role, ToolDef};

use crate::dialect::{
    FunctionDeclaration, GeminiContent, GeminiFileData, GeminiInlineData, GeminiPart,
    GeminiToolDecl,
};

fn role_to_wire(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

fn role_from_wire(role: &str) -> Role {
    match role {
        "model" => Role::Model,
        _ => Role::User,
    }
}

fn part_to_wire(part: &Part) -> GeminiPart {
    match part {
        Part::Text { text } => GeminiPart::Text(text.clone()),
        Part::InlineData { mime_type, data } => GeminiPart::InlineData(GeminiInlineData {
            mime_type: mime_type.clone(),
            data: data.clone(),
        }),
        Part::FileData { mime_type, uri } => GeminiPart::FileData(GeminiFileData {
            mime_type: mime_type.clone(),
            file_uri: uri.clone(),
        }),
        Part::FunctionCall { name, args } => GeminiPart::FunctionCall {
            name: name.clone(),
            args: args.clone(),
        },
        Part::FunctionResponse { name, response } => GeminiPart::FunctionResponse {
            name: name.clone(),
            response: response.clone(),
        },
    }
}

fn part_from_wire(part: &GeminiPart) -> Part {
    match part {
        GeminiPart::Text(text) => Part::Text { text: text.clone() },
        GeminiPart::InlineData(data) => Part::InlineData {
            mime_type: data.mime_type.clone(),
            data: data.data.clone(),
        },
        GeminiPart::FileData(data) => Part::FileData {
            mime_type: data.mime_type.clone(),
            uri: data.file_uri.clone(),
        },
        GeminiPart::FunctionCall { name, args } => Part::FunctionCall {
            name: name.clone(),
            args: args.clone(),
        },
        GeminiPart::FunctionResponse { name, response } => Part::FunctionResponse {
            name: name.clone(),
            response: response.clone(),
        },
    }
}

/// Convert conversation history into Gemini contents.
#[must_use]
pub fn to_wire(history: &[Content]) -> Vec<GeminiContent> {
    history
        .iter()
        .map(|c| GeminiContent {
            role: role_to_wire(c.role).to_string(),
            parts: c.parts.iter().map(part_to_wire).collect(),
        })
        .collect()
}

/// Convert a model reply back into a [`Content`] for the history.
#[must_use]
pub fn from_wire(content: &GeminiContent) -> Content {
    Content {
        role: role_from_wire(&content.role),
        parts: content.parts.iter().map(part_from_wire).collect(),
    }
}

/// A system instruction as a Gemini content block (role is ignored by the
/// API but required by the shape).
#[must_use]
pub fn system_instruction(text: &str) -> GeminiContent {
    GeminiContent {
        role: "user".to_string(),
        parts: vec![GeminiPart::Text(text.to_string())],
    }
}

/// Lower tool definitions into a request's tool declarations.
///
/// Returns `None` for an empty set so the request field can be omitted
/// entirely.
#[must_use]
pub fn tool_declarations(defs: &[ToolDef]) -> Option<Vec<GeminiToolDecl>> {
    if defs.is_empty() {
        return None;
    }
    Some(vec![GeminiToolDecl {
        function_declarations: defs
            .iter()
            .map(|def| FunctionDeclaration {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: def.input_schema.clone(),
            })
            .collect(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn history_roundtrips_through_the_wire_shape() {
        let history = vec![
            Content::user_text("extract this form"),
            Content {
                role: Role::Model,
                parts: vec![Part::FunctionCall {
                    name: "get_record".into(),
                    args: json!({"app_id": 1}),
                }],
            },
            Content::function_responses(vec![("get_record".into(), json!({"result": "ok"}))]),
        ];
        let wire = to_wire(&history);
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, "user");
        assert_eq!(wire[1].role, "model");
        assert_eq!(wire[2].role, "user");

        let back: Vec<Content> = wire.iter().map(from_wire).collect();
        assert_eq!(back, history);
    }

    #[test]
    fn declarations_carry_the_schema_verbatim() {
        let defs = vec![ToolDef::new(
            "add_record",
            "Insert a record",
            json!({"type": "object", "properties": {"app_id": {"type": "integer"}}}),
        )];
        let tools = tool_declarations(&defs).unwrap();
        assert_eq!(tools.len(), 1);
        let decl = &tools[0].function_declarations[0];
        assert_eq!(decl.name, "add_record");
        assert_eq!(decl.parameters["properties"]["app_id"]["type"], "integer");
    }

    #[test]
    fn no_tools_means_no_declarations() {
        assert!(tool_declarations(&[]).is_none());
    }
}
