//! Dispatcher - look up a tool by name and invoke it

use std::sync::Arc;

use tracing::debug;

use super::{Environment, ToolArgs, ToolError, ToolRegistry};

/// Routes resolved invocations to their tool
///
/// No argument validation happens here; the parser has already checked
/// required arguments.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a tool and wait for it to finish
    pub async fn execute(&self, name: &str, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(%name, ?args, "Dispatcher::execute: called");
        let tool = match self.registry.tool(name) {
            Some(tool) => tool,
            None => {
                debug!(%name, "Dispatcher::execute: unknown tool");
                return Err(ToolError::UnknownTool { name: name.to_string() });
            }
        };

        let result = tool.execute(env, args).await;
        if let Err(e) = &result {
            debug!(%name, %e, "Dispatcher::execute: tool failed");
        }
        result
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }
}
