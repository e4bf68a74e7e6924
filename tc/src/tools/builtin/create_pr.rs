//! create_pr tool - open a pull request with the GitHub CLI

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::GitConfig;
use crate::tools::sandbox::workspace_root;
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

/// Open a pull request for the current branch of the workspace
pub struct CreatePrTool {
    config: GitConfig,
}

impl CreatePrTool {
    pub fn new(config: GitConfig) -> Self {
        Self { config }
    }

    fn command_args(args: &ToolArgs, title: &str) -> Vec<String> {
        let mut argv = vec![
            "pr".to_string(),
            "create".to_string(),
            "--title".to_string(),
            title.to_string(),
            "--body".to_string(),
            args.get("body").unwrap_or_default().to_string(),
        ];
        if let Some(base) = args.get("base") {
            argv.push("--base".to_string());
            argv.push(base.to_string());
        }
        if args.get_bool("draft") {
            argv.push("--draft".to_string());
        }
        argv
    }
}

#[async_trait]
impl Tool for CreatePrTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_pr",
            "create_pr --title <title> [--body <body>] [--base <branch>] [--draft]",
            "opens a pull request for the current branch using the GitHub CLI",
        )
        .arg(ToolArgument::required("title", "string", "the pull request title"))
        .arg(ToolArgument::optional("body", "string", "the pull request description"))
        .arg(ToolArgument::optional("base", "string", "the branch to merge into"))
        .arg(ToolArgument::optional("draft", "boolean", "open the pull request as a draft"))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "CreatePrTool::execute: called");
        let title = args.require("create_pr", "title")?;
        if title.trim().is_empty() {
            return Ok("Error: title must not be empty".to_string());
        }

        let argv = Self::command_args(args, title);
        let timeout_ms = self.config.timeout_ms;

        debug!(gh = %self.config.gh_command, "CreatePrTool::execute: spawning command");
        let output = match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            tokio::process::Command::new(&self.config.gh_command)
                .args(&argv)
                .current_dir(workspace_root(&env.cwd))
                .output(),
        )
        .await
        {
            Ok(Ok(output)) => {
                debug!(status = ?output.status, "CreatePrTool::execute: command completed");
                output
            }
            Ok(Err(e)) => {
                debug!(%e, "CreatePrTool::execute: failed to execute command");
                return Ok(format!("Error: failed to run {}: {}", self.config.gh_command, e));
            }
            Err(_) => {
                debug!("CreatePrTool::execute: command timed out");
                return Ok(format!("Error: command timed out after {}ms", timeout_ms));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            debug!("CreatePrTool::execute: pull request created");
            Ok(format!("Pull request created: {}", stdout))
        } else {
            debug!(exit_code = ?output.status.code(), "CreatePrTool::execute: command failed");
            Ok(format!(
                "Error: pull request creation failed (exit code {})\n{}",
                output.status.code().unwrap_or(-1),
                if stderr.is_empty() { stdout } else { stderr }
            ))
        }
    }
}
