//! Interactive REPL for tool commands
//!
//! Reads commands line by line, collects block-form commands until their end
//! marker, and prints each tool result.

mod session;

pub use session::{LineOutcome, ReplSession};

use std::sync::Arc;

use eyre::Result;

use crate::interpreter::Interpreter;
use crate::tools::{Environment, ToolRegistry};

/// Run the interactive REPL
///
/// This is the main entry point for `tc repl`.
pub async fn run_interactive(registry: Arc<ToolRegistry>, env: Environment) -> Result<()> {
    let mut session = ReplSession::new(Interpreter::new(registry), env);
    session.run().await
}
