//! Tool system for agent commands
//!
//! Tools provide file viewing, editing, search and coordination capabilities
//! to the agent. Each call receives an `Environment` rooted at the workspace;
//! every path argument goes through the sandbox before the file system is
//! touched.

mod context;
mod dispatcher;
mod error;
mod registry;
mod traits;

pub mod builtin;
pub mod sandbox;

pub use context::{Environment, StateStore};
pub use dispatcher::Dispatcher;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolArgs, ToolArgument, ToolDefinition, ToolResult};
