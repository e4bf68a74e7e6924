//! Windowed file viewer - open, goto, scroll_down, scroll_up
//!
//! The open file and the first visible line live in the workspace state
//! store, so consecutive commands share one view.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::config::WindowConfig;
use crate::tools::sandbox::{self, display_path};
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

pub(crate) const CURRENT_FILE: &str = "CURRENT_FILE";
pub(crate) const FIRST_LINE: &str = "FIRST_LINE";

pub(crate) const NO_FILE_OPEN: &str = "No file open. Use the open command first.";

/// Currently open file
///
/// The stored path is resolved through the sandbox again on every use. The
/// error is the message to hand back to the agent.
pub(crate) async fn current_file(env: &Environment) -> Result<PathBuf, String> {
    let Some(stored) = env.get_state(CURRENT_FILE).await else {
        return Err(NO_FILE_OPEN.to_string());
    };
    sandbox::resolve(env, &stored).map_err(|e| {
        debug!(%stored, "current_file: stored path rejected");
        format!("Error: {}", e)
    })
}

async fn first_line(env: &Environment) -> usize {
    env.get_state(FIRST_LINE)
        .await
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
}

/// First window line that puts `line` in the middle of the window
pub(crate) fn centered_on(line: usize, window: &WindowConfig) -> usize {
    line.saturating_sub(window.lines / 2).max(1)
}

/// Clamp a first line so the window stays inside the file
fn clamp_first_line(first: usize, total: usize, window: &WindowConfig) -> usize {
    if total == 0 {
        return 1;
    }
    let last_start = total.saturating_sub(window.lines) + 1;
    first.clamp(1, last_start.max(1))
}

/// Render the window starting at `first` and remember it as the current view
pub(crate) async fn show_window(
    env: &Environment,
    path: &Path,
    first: usize,
    window: &WindowConfig,
) -> Result<String, ToolError> {
    debug!(?path, %first, "show_window: called");
    let content = tokio::fs::read_to_string(path).await?;
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();
    let first = clamp_first_line(first, total, window);

    env.set_state(CURRENT_FILE, &path.to_string_lossy()).await;
    env.set_state(FIRST_LINE, &first.to_string()).await;

    let end = (first - 1 + window.lines).min(total);
    let mut output = vec![format!("[File: {} ({} lines total)]", display_path(env, path), total)];
    if first > 1 {
        output.push(format!("({} more lines above)", first - 1));
    }
    for (i, line) in lines.iter().enumerate().take(end).skip(first - 1) {
        output.push(format!("{}:{}", i + 1, line));
    }
    if end < total {
        output.push(format!("({} more lines below)", total - end));
    }
    Ok(output.join("\n"))
}

fn parse_line_number(args: &ToolArgs, total: usize) -> Result<Option<usize>, String> {
    match args.get_usize("line_number") {
        Ok(None) => Ok(None),
        Ok(Some(n)) if n >= 1 && n <= total.max(1) => Ok(Some(n)),
        Ok(Some(_)) => Err(format!("Error: line_number must be between 1 and {}", total.max(1))),
        Err(e) => Err(format!("Error: {}", e)),
    }
}

async fn count_lines(path: &Path) -> Result<usize, ToolError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().count())
}

/// Open a file in the window
pub struct OpenTool {
    window: WindowConfig,
}

impl OpenTool {
    pub fn new(window: WindowConfig) -> Self {
        Self { window }
    }
}

#[async_trait]
impl Tool for OpenTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "open",
            "open <path> [<line_number>]",
            "opens the file at the given path in the editor. If line_number is provided, the window will be moved to include that line",
        )
        .arg(ToolArgument::required("path", "string", "the path to the file to open"))
        .arg(ToolArgument::optional(
            "line_number",
            "integer",
            "the line number to move the window to (if not provided, the window will start at the top of the file)",
        ))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "OpenTool::execute: called");
        let path = args.require("open", "path")?;

        let full_path = match sandbox::resolve(env, path) {
            Ok(p) => p,
            Err(e) => return Ok(format!("Error: {}", e)),
        };

        if full_path.is_dir() {
            debug!("OpenTool::execute: path is a directory");
            return Ok(format!("Error: {} is a directory. You can only open files.", path));
        }
        if !full_path.is_file() {
            debug!("OpenTool::execute: file not found");
            return Ok(format!("Error: File {} not found", path));
        }

        let total = count_lines(&full_path).await?;
        let first = match parse_line_number(args, total) {
            Ok(Some(line)) => centered_on(line, &self.window),
            Ok(None) => 1,
            Err(msg) => return Ok(msg),
        };

        show_window(env, &full_path, first, &self.window).await
    }
}

/// Move the window to a line of the open file
pub struct GotoTool {
    window: WindowConfig,
}

impl GotoTool {
    pub fn new(window: WindowConfig) -> Self {
        Self { window }
    }
}

#[async_trait]
impl Tool for GotoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "goto",
            "goto <line_number>",
            "moves the window to show <line_number>",
        )
        .arg(ToolArgument::required("line_number", "integer", "the line number to move the window to"))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "GotoTool::execute: called");
        let path = match current_file(env).await {
            Ok(p) => p,
            Err(msg) => return Ok(msg),
        };

        let total = count_lines(&path).await?;
        match parse_line_number(args, total) {
            Ok(Some(line)) => show_window(env, &path, centered_on(line, &self.window), &self.window).await,
            Ok(None) => Err(ToolError::missing("goto", "line_number")),
            Err(msg) => Ok(msg),
        }
    }
}

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Scroll the window of the open file
pub struct ScrollTool {
    direction: Direction,
    window: WindowConfig,
}

impl ScrollTool {
    pub fn new(direction: Direction, window: WindowConfig) -> Self {
        Self { direction, window }
    }
}

#[async_trait]
impl Tool for ScrollTool {
    fn definition(&self) -> ToolDefinition {
        let (name, which) = match self.direction {
            Direction::Up => ("scroll_up", "up"),
            Direction::Down => ("scroll_down", "down"),
        };
        ToolDefinition::new(
            name,
            name,
            format!("moves the window {} {} lines", which, self.window.scroll_step()),
        )
    }

    async fn execute(&self, env: &Environment, _args: &ToolArgs) -> Result<String, ToolError> {
        debug!(direction = ?self.direction, "ScrollTool::execute: called");
        let path = match current_file(env).await {
            Ok(p) => p,
            Err(msg) => return Ok(msg),
        };

        let current = first_line(env).await;
        let step = self.window.scroll_step();
        let first = match self.direction {
            Direction::Up => current.saturating_sub(step).max(1),
            Direction::Down => current + step,
        };

        show_window(env, &path, first, &self.window).await
    }
}
