//! ToolRegistry - the catalog of registered tools
//!
//! The registry is filled during startup by the builtin "load" steps and then
//! frozen behind an `Arc`; the parser and dispatcher only ever read it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;

use super::builtin;
use super::{Tool, ToolDefinition, ToolError};

struct Entry {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

/// Catalog of tools keyed by unique name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin tool family
    pub fn standard(config: &Config) -> Result<Self, ToolError> {
        debug!("ToolRegistry::standard: called");
        let mut registry = Self::new();

        builtin::load_window_tools(&mut registry, &config.window)?;
        builtin::load_search_tools(&mut registry, &config.search)?;
        builtin::load_env_tools(&mut registry)?;
        builtin::load_web_tools(&mut registry, &config.web)?;
        builtin::load_git_tools(&mut registry, &config.git)?;

        info!(tools = %registry.len(), "ToolRegistry::standard: catalog loaded");
        Ok(registry)
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    ///
    /// A second registration under the same name replaces the first one as a
    /// whole and keeps its position in the catalog.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let definition = tool.definition();
        debug!(name = %definition.name, "ToolRegistry::register: called");
        validate(&definition)?;

        let entry = Entry { definition, tool };
        match self.index.get(&entry.definition.name) {
            Some(&slot) => {
                debug!(name = %entry.definition.name, "ToolRegistry::register: replacing existing tool");
                self.entries[slot] = entry;
            }
            None => {
                self.index.insert(entry.definition.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Look up a tool's definition
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&slot| &self.entries[slot].definition)
    }

    /// Look up a tool's implementation
    pub fn tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.entries[slot].tool))
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All definitions in registration order
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.entries.iter().map(|e| &e.definition).collect()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.definition.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the catalog for the agent prompt
    ///
    /// The text is pasted into the prompt verbatim, so the layout is fixed:
    /// one block per tool, blocks separated by a single blank line.
    pub fn generate_docs(&self) -> String {
        debug!(tools = %self.entries.len(), "ToolRegistry::generate_docs: called");
        self.entries
            .iter()
            .map(|e| render_tool_docs(&e.definition))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn validate(definition: &ToolDefinition) -> Result<(), ToolError> {
    if definition.name.trim().is_empty() {
        return Err(ToolError::InvalidDefinition("tool name is required".to_string()));
    }
    if definition.name.chars().any(char::is_whitespace) {
        return Err(ToolError::InvalidDefinition(format!(
            "tool name '{}' must not contain whitespace",
            definition.name
        )));
    }
    if definition.signature.trim().is_empty() {
        return Err(ToolError::InvalidDefinition(format!(
            "tool '{}' has no signature",
            definition.name
        )));
    }
    // Each docs field renders on a single line
    let multiline = [&definition.signature, &definition.docstring]
        .into_iter()
        .chain(definition.arguments.iter().map(|a| &a.description))
        .any(|text| text.contains('\n'));
    if multiline {
        return Err(ToolError::InvalidDefinition(format!(
            "tool '{}' has a multi-line signature, docstring or argument description",
            definition.name
        )));
    }
    Ok(())
}

fn render_tool_docs(definition: &ToolDefinition) -> String {
    let mut lines = vec![
        format!("{}:", definition.name),
        format!("  docstring: {}", definition.docstring),
        format!("  signature: {}", definition.signature),
        "  arguments:".to_string(),
    ];
    for arg in &definition.arguments {
        let tag = if arg.required { "required" } else { "optional" };
        lines.push(format!(
            "    - {} ({}) [{}]: {}",
            arg.name, arg.arg_type, tag, arg.description
        ));
    }
    lines.join("\n")
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}
