// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and environment overlay for formdesk.
//!
//! Settings come from an optional TOML file (`formdesk.toml` by default),
//! with `FORMDESK_MODEL` and `FORMDESK_LOG` overriding the file. The Gemini
//! credential itself never lives here — the SDK reads `GOOGLE_API_KEY`
//! directly.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "formdesk.toml";

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Upper bound on the agent turn cap.
const MAX_TURNS_LIMIT: u32 = 128;

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

/// Advisory issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No tool servers are configured; the agent will only have its native
    /// extraction tools.
    NoServers,
    /// The turn cap is unusually large.
    LargeTurnCap {
        /// Configured value.
        max_turns: u32,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::NoServers => {
                write!(f, "no tool servers configured; only extraction tools available")
            }
            ConfigWarning::LargeTurnCap { max_turns } => {
                write!(f, "max_turns is unusually large ({max_turns})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormdeskConfig {
    /// Gemini model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt override. `None` uses the built-in operator prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Cap on model turns per run.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Log level (e.g. `"info"`, `"debug"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Named tool-server definitions.
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_turns() -> u32 {
    16
}

impl Default for FormdeskConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: None,
            max_turns: default_max_turns(),
            log_level: None,
            servers: BTreeMap::new(),
        }
    }
}

/// Configuration for a single tool server spawned over stdio.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerEntry {
    /// Command to spawn (e.g. `node`).
    pub command: String,
    /// Extra CLI arguments (e.g. the server script path).
    #[serde(default)]
    pub args: Vec<String>,
    /// Additional environment variables for the server process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl FormdeskConfig {
    /// Load configuration from an optional TOML file path.
    ///
    /// An explicit `path` must exist. With `None`, the default path is used
    /// when present and built-in defaults otherwise. The environment overlay
    /// is applied in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: p.display().to_string(),
                    });
                }
                Self::from_toml(&std::fs::read_to_string(p)?)?
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_toml(&std::fs::read_to_string(default)?)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overlay();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })
    }

    fn apply_env_overlay(&mut self) {
        if let Ok(model) = std::env::var("FORMDESK_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }
        if let Ok(level) = std::env::var("FORMDESK_LOG")
            && !level.is_empty()
        {
            self.log_level = Some(level);
        }
    }

    /// Check semantic constraints, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut reasons = Vec::new();

        if self.model.trim().is_empty() {
            reasons.push("model must not be empty".to_string());
        }
        if self.max_turns == 0 {
            reasons.push("max_turns must be at least 1".to_string());
        }
        if self.max_turns > MAX_TURNS_LIMIT {
            reasons.push(format!("max_turns must be at most {MAX_TURNS_LIMIT}"));
        }
        if let Some(level) = &self.log_level
            && !VALID_LOG_LEVELS.contains(&level.as_str())
        {
            reasons.push(format!(
                "unknown log level '{level}' (expected one of {VALID_LOG_LEVELS:?})"
            ));
        }
        for (name, server) in &self.servers {
            if server.command.trim().is_empty() {
                reasons.push(format!("server '{name}' has an empty command"));
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError { reasons })
        }
    }

    /// Advisory warnings for a valid configuration.
    #[must_use]
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();
        if self.servers.is_empty() {
            out.push(ConfigWarning::NoServers);
        }
        if self.max_turns > 64 {
            out.push(ConfigWarning::LargeTurnCap {
                max_turns: self.max_turns,
            });
        }
        out
    }
}
