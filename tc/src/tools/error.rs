//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the registry, parser, dispatcher and tools
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool definition: {0}")]
    InvalidDefinition(String),

    #[error("Missing required argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },

    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("path outside workspace: {path} (workspace: {workspace})")]
    SandboxViolation { path: String, workspace: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Shorthand for a missing argument error
    pub fn missing(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            tool: tool.into(),
            argument: argument.into(),
        }
    }
}
