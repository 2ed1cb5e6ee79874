// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tool-server process specification.

use std::collections::BTreeMap;

/// Configuration for spawning a tool-server process (command, args, env, cwd).
#[derive(Debug, Clone)]
pub struct ServerSpec {
    /// Executable command to run (e.g. `node`).
    pub command: String,
    /// Arguments passed to the command (e.g. the server script path).
    pub args: Vec<String>,
    /// Additional environment variables for the process.
    pub env: BTreeMap<String, String>,
    /// Optional working directory override.
    pub cwd: Option<String>,
}

impl ServerSpec {
    /// Create a spec with the given command and default (empty) args/env.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}
