//! create and edit tools - change files through the window

use async_trait::async_trait;
use tracing::debug;

use crate::config::WindowConfig;
use crate::tools::sandbox;
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

use super::window::{centered_on, current_file, show_window};

/// End marker of the edit block
pub const EDIT_END_MARKER: &str = "end_of_edit";

/// Create a new empty file and open it
pub struct CreateTool {
    window: WindowConfig,
}

impl CreateTool {
    pub fn new(window: WindowConfig) -> Self {
        Self { window }
    }
}

#[async_trait]
impl Tool for CreateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("create", "create <filename>", "creates and opens a new file with the given name")
            .arg(ToolArgument::required("filename", "string", "the name of the file to create"))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "CreateTool::execute: called");
        let filename = args.require("create", "filename")?;

        let full_path = match sandbox::resolve(env, filename) {
            Ok(p) => p,
            Err(e) => return Ok(format!("Error: {}", e)),
        };

        if full_path.exists() {
            debug!("CreateTool::execute: file already exists");
            return Ok(format!("Error: File '{}' already exists.", filename));
        }

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, "").await?;

        show_window(env, &full_path, 1, &self.window).await
    }
}

/// Replace a line range of the open file
pub struct EditTool {
    window: WindowConfig,
}

impl EditTool {
    pub fn new(window: WindowConfig) -> Self {
        Self { window }
    }
}

#[async_trait]
impl Tool for EditTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "edit",
            "edit <start_line>:<end_line>",
            format!(
                "replaces lines <start_line> through <end_line> (inclusive) with the given text in the open file. \
                 The replacement text goes on the lines after the command and is terminated by a line with only {} on it",
                EDIT_END_MARKER
            ),
        )
        .arg(ToolArgument::required("start_line", "integer", "the line number to start the edit at"))
        .arg(ToolArgument::required("end_line", "integer", "the line number to end the edit at (inclusive)"))
        .arg(ToolArgument::required(
            "content",
            "string",
            "the text to replace the current selection with",
        ))
        .end_name(EDIT_END_MARKER)
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "EditTool::execute: called");
        let path = match current_file(env).await {
            Ok(p) => p,
            Err(msg) => return Ok(msg),
        };

        let start = args
            .get_usize("start_line")?
            .ok_or_else(|| ToolError::missing("edit", "start_line"))?;
        let end = args
            .get_usize("end_line")?
            .ok_or_else(|| ToolError::missing("edit", "end_line"))?;
        let replacement = args.get("content").unwrap_or_default();

        let original = tokio::fs::read_to_string(&path).await?;
        let mut lines: Vec<&str> = original.lines().collect();
        let total = lines.len();

        if start == 0 || start > total + 1 {
            return Ok(format!("Error: start_line must be between 1 and {}", total + 1));
        }
        if end < start {
            return Ok(format!(
                "Error: end_line ({}) must be greater than or equal to start_line ({})",
                end, start
            ));
        }

        let end = end.min(total);
        let new_lines: Vec<&str> = if replacement.is_empty() {
            Vec::new()
        } else {
            replacement.lines().collect()
        };
        let replace_to = end.max(start - 1);
        lines.splice(start - 1..replace_to, new_lines);

        let mut updated = lines.join("\n");
        if !lines.is_empty() && (original.ends_with('\n') || original.is_empty()) {
            updated.push('\n');
        }
        tokio::fs::write(&path, updated).await?;
        debug!(%start, %end, "EditTool::execute: file updated");

        show_window(env, &path, centered_on(start, &self.window), &self.window).await
    }
}
