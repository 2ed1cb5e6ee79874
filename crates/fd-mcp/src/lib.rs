// SPDX-License-Identifier: MIT OR Apache-2.0
//! # fd-mcp
//!
//! Minimal MCP client over the stdio transport.
//!
//! The tool server is spawned as a subprocess and spoken to with one JSON-RPC
//! 2.0 message per line on stdin/stdout ([`codec`]). [`McpClient`] performs
//! the `initialize` handshake and exposes the two requests this system needs:
//! `tools/list` and `tools/call`.

#![deny(unsafe_code)]

mod client;
mod codec;
mod process;
mod spec;

pub use client::{McpClient, ToolOutput};
pub use process::McpProcess;
pub use spec::ServerSpec;

/// Errors from spawning or talking to a tool server.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// The server process could not be spawned.
    #[error("failed to spawn tool server: {0}")]
    Spawn(#[source] std::io::Error),

    /// Writing to the server's stdin failed.
    #[error("failed to write to tool server: {0}")]
    Stdin(#[source] std::io::Error),

    /// Reading from the server's stdout failed.
    #[error("failed to read from tool server: {0}")]
    Stdout(#[source] std::io::Error),

    /// A message could not be encoded as a JSON line.
    #[error("failed to encode message: {0}")]
    Encode(String),

    /// A line from the server was not valid JSON.
    #[error("failed to decode message: {0}")]
    Decode(String),

    /// The server answered a request with a JSON-RPC error object.
    #[error("tool server error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Server-supplied error message.
        message: String,
    },

    /// The server violated the expected message flow.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The server closed its stdout before answering.
    #[error("tool server closed the connection")]
    ServerClosed,
}
