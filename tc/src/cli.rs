//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// toolcmd - tool command interpreter
#[derive(Parser)]
#[command(
    name = "tc",
    about = "Parse and run plain-text agent tool commands",
    version,
    after_help = "Logs are written to: ~/.local/share/toolcmd/logs/toolcmd.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Workspace root (overrides the config file)
    #[arg(short, long, global = true, help = "Workspace root all tools are confined to")]
    pub workspace: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Print the tool catalog documentation
    Docs,

    /// Parse a command and print the resolved invocation as JSON
    Parse {
        /// Command text; `-` reads it from stdin
        command: String,
    },

    /// Parse and execute a single command
    Run {
        /// Command text; `-` reads it from stdin
        command: String,
    },

    /// Read commands interactively
    Repl,
}
