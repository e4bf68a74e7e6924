//! toolcmd - plain-text tool command interpreter
//!
//! CLI entry point for printing the tool catalog, parsing and running commands.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use tracing::info;

use toolcmd::cli::{Cli, Command};
use toolcmd::config::Config;
use toolcmd::interpreter::Interpreter;
use toolcmd::tools::{Environment, ToolRegistry};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolcmd")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("toolcmd.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let workspace = cli
        .workspace
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.workspace.root));
    info!(workspace = %workspace.display(), "toolcmd loaded config");

    let registry = Arc::new(ToolRegistry::standard(&config).context("Failed to build tool registry")?);
    let env = Environment::new(workspace);

    // Dispatch command
    match cli.command {
        Some(Command::Docs) => cmd_docs(registry),
        Some(Command::Parse { command }) => cmd_parse(registry, &command),
        Some(Command::Run { command }) => cmd_run(registry, env, &command).await,
        Some(Command::Repl) => toolcmd::repl::run_interactive(registry, env).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Read the command text, `-` meaning stdin
fn read_command(command: &str) -> Result<String> {
    if command != "-" {
        return Ok(command.to_string());
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read command from stdin")?;
    Ok(input)
}

/// Print the tool catalog
fn cmd_docs(registry: Arc<ToolRegistry>) -> Result<()> {
    println!("{}", registry.generate_docs());
    Ok(())
}

/// Parse a command and print the invocation as JSON
fn cmd_parse(registry: Arc<ToolRegistry>, command: &str) -> Result<()> {
    let input = read_command(command)?;
    let interpreter = Interpreter::new(registry);

    match interpreter.parse(&input).context("Failed to parse command")? {
        Some(invocation) => {
            println!("{}", serde_json::to_string_pretty(&invocation)?);
        }
        None => {
            eprintln!("Not a tool command");
            std::process::exit(2);
        }
    }
    Ok(())
}

/// Parse and execute a single command
async fn cmd_run(registry: Arc<ToolRegistry>, env: Environment, command: &str) -> Result<()> {
    let input = read_command(command)?;
    let interpreter = Interpreter::new(registry);

    match interpreter.handle(&input, &env).await {
        Some(result) if result.is_error => {
            eprintln!("Error: {}", result.content);
            std::process::exit(1);
        }
        Some(result) => {
            println!("{}", result.content);
            Ok(())
        }
        None => {
            eprintln!("Not a tool command");
            std::process::exit(2);
        }
    }
}
