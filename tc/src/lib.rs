//! toolcmd - plain-text tool command interpreter for coding agents
//!
//! An agent drives its tools by writing commands as plain text. This crate
//! turns that text into validated, structured invocations of a fixed tool
//! catalog and runs them inside a sandboxed workspace.
//!
//! # Core Concepts
//!
//! - **Closed Catalog**: Tools register once at startup; the registry is then frozen
//! - **Two Command Shapes**: single-line `tool --flag value positional` and block form
//!   terminated by an end-marker line
//! - **Absent, Not Failed**: Text that does not start with a tool name is handed back
//!   to the caller untouched
//! - **Sandboxed Paths**: Every path argument is resolved inside the workspace root
//!
//! # Modules
//!
//! - [`command`] - Tokenizer and parser
//! - [`tools`] - Tool trait, registry, dispatcher, sandbox and builtin tools
//! - [`interpreter`] - Parse-and-dispatch front door
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive command loop

pub mod cli;
pub mod command;
pub mod config;
pub mod interpreter;
pub mod repl;
pub mod tools;

// Re-export commonly used types
pub use command::{Invocation, Parser, tokenize};
pub use config::Config;
pub use interpreter::Interpreter;
pub use tools::{
    Dispatcher, Environment, StateStore, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError, ToolRegistry,
    ToolResult,
};
