//! Interpreter - parse a command and dispatch it in one step

use std::sync::Arc;

use tracing::{debug, info};

use crate::command::{Invocation, Parser};
use crate::tools::{Dispatcher, Environment, ToolError, ToolRegistry, ToolResult};

/// Front door for agent output
///
/// Wraps a [`Parser`] and a [`Dispatcher`] sharing one frozen registry.
/// Malformed commands and tool failures come back as error results; nothing
/// the agent writes can bring the host down.
#[derive(Clone)]
pub struct Interpreter {
    parser: Parser,
    dispatcher: Dispatcher,
}

impl Interpreter {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            parser: Parser::new(Arc::clone(&registry)),
            dispatcher: Dispatcher::new(registry),
        }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_tool_command(&self, line: &str) -> bool {
        self.parser.is_tool_command(line)
    }

    pub fn parse(&self, input: &str) -> Result<Option<Invocation>, ToolError> {
        self.parser.parse(input)
    }

    /// Catalog documentation for the agent prompt
    pub fn docs(&self) -> String {
        self.parser.registry().generate_docs()
    }

    /// Handle one command
    ///
    /// Returns `None` when the input is not a tool command.
    pub async fn handle(&self, input: &str, env: &Environment) -> Option<ToolResult> {
        debug!(%input, "Interpreter::handle: called");
        let invocation = match self.parser.parse(input) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => {
                debug!("Interpreter::handle: not a tool command");
                return None;
            }
            Err(e) => {
                debug!(%e, "Interpreter::handle: malformed invocation");
                return Some(ToolResult::error(e.to_string()));
            }
        };

        info!(tool = %invocation.name, "Interpreter::handle: dispatching");
        let result = match self.dispatcher.execute(&invocation.name, env, &invocation.args).await {
            Ok(content) => ToolResult::success(content),
            Err(e) => ToolResult::error(e.to_string()),
        };
        Some(result)
    }
}
