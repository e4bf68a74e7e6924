//! Tool trait and definition types

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::Environment;
use super::error::ToolError;

/// A capability the agent can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static description used for parsing and documentation
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool
    ///
    /// Predictable conditions (no matches, file not found, sandbox violation)
    /// are reported as `Ok` text so the agent can read them next turn.
    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError>;
}

/// One declared argument of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: String,
    pub description: String,
    pub required: bool,
}

impl ToolArgument {
    pub fn required(name: impl Into<String>, arg_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: arg_type.into(),
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, arg_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: arg_type.into(),
            description: description.into(),
            required: false,
        }
    }
}

/// Schema of a tool: name, documentation strings and ordered arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Command word; unique across the registry
    pub name: String,

    /// Usage line shown in documentation
    pub signature: String,

    /// One-line description
    pub docstring: String,

    /// Declared arguments; order is positional-assignment priority
    pub arguments: Vec<ToolArgument>,

    /// End marker line for block-form commands
    pub end_name: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, signature: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            docstring: docstring.into(),
            arguments: Vec::new(),
            end_name: None,
        }
    }

    pub fn arg(mut self, argument: ToolArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn end_name(mut self, marker: impl Into<String>) -> Self {
        self.end_name = Some(marker.into());
        self
    }

    pub fn is_block_form(&self) -> bool {
        self.end_name.is_some()
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.iter().any(|a| a.name == name)
    }
}

/// Resolved argument mapping; every value is a string
///
/// Coercion happens in the tool through the typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArgs(BTreeMap<String, String>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Value of an argument the tool cannot run without
    pub fn require(&self, tool: &str, name: &str) -> Result<&str, ToolError> {
        self.get(name).ok_or_else(|| ToolError::missing(tool, name))
    }

    /// Parse an argument as a non-negative integer
    pub fn get_usize(&self, name: &str) -> Result<Option<usize>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| ToolError::InvalidArgument(format!("{} must be an integer, got '{}'", name, raw))),
        }
    }

    /// Parse an argument as a flag; bare `--flag` arrives as "true"
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(
            self.get(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "yes")
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Result of a handled command, as presented back to the agent
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("File opened");
        assert!(!result.is_error);
        assert_eq!(result.content, "File opened");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Tool not found: nope");
        assert!(result.is_error);
        assert_eq!(result.content, "Tool not found: nope");
    }

    #[test]
    fn test_definition_builder() {
        let def = ToolDefinition::new("edit", "edit <start>:<end>", "Replace lines")
            .arg(ToolArgument::required("start_line", "integer", "first line"))
            .arg(ToolArgument::optional("content", "string", "new text"))
            .end_name("end_of_edit");

        assert!(def.is_block_form());
        assert!(def.has_argument("start_line"));
        assert!(!def.has_argument("end_line"));
        assert!(def.arguments[0].required);
        assert!(!def.arguments[1].required);
    }

    #[test]
    fn test_args_typed_accessors() {
        let args = ToolArgs::new()
            .with("line_number", "42")
            .with("bad", "forty")
            .with("force", "true");

        assert_eq!(args.get_usize("line_number").unwrap(), Some(42));
        assert_eq!(args.get_usize("missing").unwrap(), None);
        assert!(matches!(args.get_usize("bad"), Err(ToolError::InvalidArgument(_))));
        assert!(args.get_bool("force"));
        assert!(!args.get_bool("missing"));
    }

    #[test]
    fn test_args_require() {
        let args = ToolArgs::new().with("key", "value");

        assert_eq!(args.require("read_env", "key").unwrap(), "value");
        let err = args.require("read_env", "other").unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { .. }));
    }

    #[test]
    fn test_args_serialize_as_plain_map() {
        let args: ToolArgs = [("dir", "src"), ("search_term", "needle")].into_iter().collect();
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"{"dir":"src","search_term":"needle"}"#);
    }
}
