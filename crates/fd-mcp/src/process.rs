// SPDX-License-Identifier: MIT OR Apache-2.0
//! Low-level process spawning and stdio management for the tool server.

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tracing::warn;

use serde_json::Value;

use super::codec::{decode_line, encode_line};
use super::{McpError, ServerSpec};

/// A spawned tool-server process with captured stdin/stdout.
#[derive(Debug)]
pub struct McpProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<tokio::process::ChildStdout>,
}

impl McpProcess {
    /// Spawn a tool server from the given specification.
    ///
    /// Stderr is drained in a background task and forwarded through `tracing`
    /// at warn level.
    pub async fn spawn(spec: &ServerSpec) -> Result<Self, McpError> {
        let mut cmd = Command::new(&spec.command);
        cmd.args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        for (k, v) in &spec.env {
            cmd.env(k, v);
        }

        let mut child = cmd.spawn().map_err(McpError::Spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::Protocol("stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::Protocol("stdout unavailable".into()))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut r = BufReader::new(stderr);
                let mut line = String::new();
                loop {
                    line.clear();
                    match r.read_line(&mut line).await {
                        Ok(0) => break,
                        Ok(_) => {
                            let s = line.trim_end();
                            if !s.is_empty() {
                                warn!(target: "fd_mcp.stderr", "{s}");
                            }
                        }
                        Err(_) => break,
                    }
                }
            });
        }

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Send one JSON-RPC message to the server's stdin.
    pub async fn send(&mut self, message: &Value) -> Result<(), McpError> {
        let line = encode_line(message)?;
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(McpError::Stdin)?;
        self.stdin.flush().await.map_err(McpError::Stdin)?;
        Ok(())
    }

    /// Read the next JSON-RPC message from the server's stdout, or `None` on
    /// EOF. Blank lines are skipped.
    pub async fn recv(&mut self) -> Result<Option<Value>, McpError> {
        loop {
            let mut buf = String::new();
            let n = self
                .stdout
                .read_line(&mut buf)
                .await
                .map_err(McpError::Stdout)?;
            if n == 0 {
                return Ok(None);
            }
            let line = buf.trim_end();
            if line.is_empty() {
                continue;
            }
            return decode_line(line).map(Some);
        }
    }

    /// Kill the server process and wait for it to exit.
    pub async fn kill(&mut self) {
        let _ = self.child.kill().await;
        let _ = self.child.wait().await;
    }
}
