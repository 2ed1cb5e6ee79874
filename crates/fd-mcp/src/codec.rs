// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line-delimited JSON framing for the stdio transport.

use serde_json::Value;

use super::McpError;

pub(crate) fn encode_line(message: &Value) -> Result<String, McpError> {
    let mut s = serde_json::to_string(message).map_err(|e| McpError::Encode(e.to_string()))?;
    s.push('\n');
    Ok(s)
}

pub(crate) fn decode_line(line: &str) -> Result<Value, McpError> {
    serde_json::from_str(line).map_err(|e| McpError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_appends_newline() {
        let line = encode_line(&json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert!(line.ends_with('\n'));
        assert!(!line[..line.len() - 1].contains('\n'));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_line("not json"), Err(McpError::Decode(_))));
    }

    #[test]
    fn roundtrip() {
        let msg = json!({"jsonrpc": "2.0", "method": "tools/list", "id": 7});
        let line = encode_line(&msg).unwrap();
        assert_eq!(decode_line(line.trim_end()).unwrap(), msg);
    }
}
