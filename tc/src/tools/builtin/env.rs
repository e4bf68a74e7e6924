//! read_env and write_env tools - workspace state variables

use async_trait::async_trait;
use tracing::debug;

use super::window::{CURRENT_FILE, FIRST_LINE};
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

/// Read a workspace state variable
pub struct ReadEnvTool;

#[async_trait]
impl Tool for ReadEnvTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "read_env",
            "read_env <key> [<default>]",
            "reads a variable from the workspace state; prints the default if it is not set",
        )
        .arg(ToolArgument::required("key", "string", "name of the variable"))
        .arg(ToolArgument::optional("default", "string", "value returned when the variable is not set"))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "ReadEnvTool::execute: called");
        let key = args.require("read_env", "key")?;

        match env.get_state(key).await {
            Some(value) => Ok(value),
            None => match args.get("default") {
                Some(default) => Ok(default.to_string()),
                None => Ok(format!("Variable {} is not set", key)),
            },
        }
    }
}

/// Write a workspace state variable
pub struct WriteEnvTool;

#[async_trait]
impl Tool for WriteEnvTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "write_env",
            "write_env <key> <value>",
            "stores a variable in the workspace state for later commands",
        )
        .arg(ToolArgument::required("key", "string", "name of the variable"))
        .arg(ToolArgument::required("value", "string", "value to store (quote it if it contains spaces)"))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "WriteEnvTool::execute: called");
        let key = args.require("write_env", "key")?;
        let value = args.require("write_env", "value")?;

        if key.chars().any(char::is_whitespace) {
            return Ok(format!("Error: variable name '{}' must not contain whitespace", key));
        }
        if [CURRENT_FILE, FIRST_LINE].contains(&key) {
            debug!(%key, "WriteEnvTool::execute: reserved variable");
            return Ok(format!("Error: {} is managed by the editor window and cannot be set", key));
        }

        env.set_state(key, value).await;
        Ok(format!("Set {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_write_then_read() {
        let env = Environment::new(PathBuf::from("/ws"));

        let out = WriteEnvTool
            .execute(&env, &ToolArgs::new().with("key", "TARGET").with("value", "src/lib.rs"))
            .await
            .unwrap();
        assert_eq!(out, "Set TARGET");

        let out = ReadEnvTool
            .execute(&env, &ToolArgs::new().with("key", "TARGET"))
            .await
            .unwrap();
        assert_eq!(out, "src/lib.rs");
    }

    #[tokio::test]
    async fn test_read_unset_variable() {
        let env = Environment::new(PathBuf::from("/ws"));

        let out = ReadEnvTool
            .execute(&env, &ToolArgs::new().with("key", "MISSING"))
            .await
            .unwrap();
        assert_eq!(out, "Variable MISSING is not set");

        let out = ReadEnvTool
            .execute(&env, &ToolArgs::new().with("key", "MISSING").with("default", "fallback"))
            .await
            .unwrap();
        assert_eq!(out, "fallback");
    }

    #[tokio::test]
    async fn test_read_sees_window_state() {
        let env = Environment::new(PathBuf::from("/ws"));
        env.set_state("CURRENT_FILE", "/ws/a.rs").await;

        let out = ReadEnvTool
            .execute(&env, &ToolArgs::new().with("key", "CURRENT_FILE"))
            .await
            .unwrap();
        assert_eq!(out, "/ws/a.rs");
    }

    #[tokio::test]
    async fn test_write_rejects_whitespace_key() {
        let env = Environment::new(PathBuf::from("/ws"));

        let out = WriteEnvTool
            .execute(&env, &ToolArgs::new().with("key", "A B").with("value", "x"))
            .await
            .unwrap();
        assert!(out.contains("must not contain whitespace"));
        assert!(env.get_state("A B").await.is_none());
    }

    #[tokio::test]
    async fn test_write_rejects_window_keys() {
        let env = Environment::new(PathBuf::from("/ws"));

        for key in ["CURRENT_FILE", "FIRST_LINE"] {
            let out = WriteEnvTool
                .execute(&env, &ToolArgs::new().with("key", key).with("value", "/etc/passwd"))
                .await
                .unwrap();
            assert!(out.contains("cannot be set"), "{}", out);
            assert!(env.get_state(key).await.is_none());
        }
    }
}
