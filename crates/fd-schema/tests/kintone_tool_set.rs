// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalize-then-filter over a realistic slice of the Kintone tool set.

use fd_core::ToolDef;
use fd_schema::{EXCLUDED_TOOLS, normalize_tools, retain_invocable};
use serde_json::json;

fn kintone_tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "get_record",
            "Fetch a single record from an app",
            json!({
                "type": "object",
                "properties": {
                    "app_id": {"type": "number", "description": "App ID"},
                    "record_id": {"type": "number", "description": "Record ID"},
                },
                "required": ["app_id", "record_id"],
            }),
        ),
        ToolDef::new(
            "search_records",
            "Search records with a query",
            json!({
                "type": "object",
                "properties": {
                    "app_id": {"type": "number"},
                    "query": {"type": "string"},
                    "fields": {"type": "array", "items": {"type": "string"}},
                },
                "required": ["app_id"],
            }),
        ),
        ToolDef::new(
            "add_record",
            "Insert a record",
            json!({
                "type": "object",
                "properties": {
                    "app_id": {"type": "number"},
                    "fields": {"type": "object"},
                },
                "required": ["app_id", "fields"],
            }),
        ),
        ToolDef::new(
            "update_form_layout",
            "Rewrite an app's form layout",
            json!({
                "type": "object",
                "properties": {
                    "app_id": {"type": "number"},
                    "layout": {"type": "array", "items": {"type": "object"}},
                },
            }),
        ),
        ToolDef::new(
            "create_reference_table_field",
            "Add a reference-table field",
            json!({"type": "object", "properties": {"app_id": {"type": "number"}}}),
        ),
    ]
}

#[test]
fn normalized_set_keeps_length_and_order() {
    let tools = kintone_tools();
    let fixed = normalize_tools(&tools);
    assert_eq!(fixed.len(), tools.len());
    for (before, after) in tools.iter().zip(&fixed) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.description, after.description);
    }
}

#[test]
fn every_number_declaration_is_rewritten() {
    let fixed = normalize_tools(&kintone_tools());
    let get_record = &fixed[0];
    assert_eq!(
        get_record.input_schema["properties"]["app_id"]["type"],
        json!("integer")
    );
    assert_eq!(
        get_record.input_schema["properties"]["record_id"]["type"],
        json!("integer")
    );
    // Non-numeric declarations survive untouched.
    assert_eq!(
        get_record.input_schema["properties"]["app_id"]["description"],
        json!("App ID")
    );
    let search = &fixed[1];
    assert_eq!(
        search.input_schema["properties"]["fields"]["items"]["type"],
        json!("string")
    );
}

#[test]
fn originals_survive_normalization_untouched() {
    let tools = kintone_tools();
    let snapshot = tools.clone();
    let _ = normalize_tools(&tools);
    assert_eq!(tools, snapshot);
}

#[test]
fn pipeline_drops_the_provider_incompatible_tools() {
    let kept = retain_invocable(normalize_tools(&kintone_tools()), EXCLUDED_TOOLS);
    let names: Vec<&str> = kept.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["get_record", "search_records", "add_record"]);
    // The survivors' schemas are the normalized ones.
    assert_eq!(
        kept[2].input_schema["properties"]["app_id"]["type"],
        json!("integer")
    );
}
