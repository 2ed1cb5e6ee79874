// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # fd-schema
//!
//! Schema compatibility between the tool server and the model provider.
//!
//! The Kintone tool server declares numeric tool inputs as JSON-schema
//! `"number"`; Gemini's function-calling surface rejects those declarations
//! and wants `"integer"`. Rather than patching the server, the fix lives in
//! one auditable place at the boundary: [`normalize_schema`] rewrites every
//! `"type": "number"` entry in a schema tree to `"type": "integer"` and
//! leaves everything else untouched.
//!
//! A handful of tools fail on the provider side even with a normalized
//! schema. [`retain_invocable`] drops those by name after normalization;
//! the default set is [`EXCLUDED_TOOLS`].

use fd_core::ToolDef;
use serde_json::{Map, Value};

// ── Normalizer ──────────────────────────────────────────────────────────

/// Rewrite every `"type": "number"` entry in `schema` to `"type": "integer"`.
///
/// The input is an arbitrary JSON-schema-shaped tree from a third-party
/// server, so no shape is assumed beyond [`Value`]'s own recursion: objects
/// and arrays are rebuilt with normalized children, scalars pass through
/// unchanged. The function is total — there are no error conditions — and
/// never mutates its input.
///
/// Normalizing twice equals normalizing once, and the output always has the
/// same tree shape as the input.
#[must_use]
pub fn normalize_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                if key == "type" && value.as_str() == Some("number") {
                    out.insert(key.clone(), Value::String("integer".into()));
                } else if matches!(value, Value::Object(_) | Value::Array(_)) {
                    out.insert(key.clone(), normalize_schema(value));
                } else {
                    // Scalars are immutable; sharing the value is safe.
                    out.insert(key.clone(), value.clone());
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_schema).collect()),
        other => other.clone(),
    }
}

/// Produce a new [`ToolDef`] whose input schema has been normalized.
///
/// Every other field is copied from `def`; the original definition is left
/// untouched.
#[must_use]
pub fn normalize_tool(def: &ToolDef) -> ToolDef {
    def.with_input_schema(normalize_schema(&def.input_schema))
}

/// Normalize a whole tool set, preserving length and order.
#[must_use]
pub fn normalize_tools(defs: &[ToolDef]) -> Vec<ToolDef> {
    defs.iter().map(normalize_tool).collect()
}

// ── Exclusion policy ────────────────────────────────────────────────────

/// Tools the provider cannot invoke reliably even after normalization.
pub const EXCLUDED_TOOLS: &[&str] = &["update_form_layout", "create_reference_table_field"];

/// Drop tool definitions whose name appears in `excluded`.
///
/// This is deliberate policy layered on top of the normalizer, not part of
/// it: the surviving definitions keep their (already normalized) schemas.
#[must_use]
pub fn retain_invocable(defs: Vec<ToolDef>, excluded: &[&str]) -> Vec<ToolDef> {
    defs.into_iter()
        .filter(|def| !excluded.contains(&def.name.as_str()))
        .collect()
}
