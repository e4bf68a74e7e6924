//! REPL session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::interpreter::Interpreter;
use crate::tools::{Environment, ToolResult};

/// Interactive REPL session
pub struct ReplSession {
    interpreter: Interpreter,
    env: Environment,
    /// Lines of a block-form command still waiting for its end marker
    pending: Vec<String>,
}

/// What the session did with one input line
#[derive(Debug)]
pub enum LineOutcome {
    /// Block command needs more lines before it can run
    NeedMore { end_marker: String },
    /// Input was not a tool command
    NotACommand(String),
    /// Command was handled
    Handled(ToolResult),
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(interpreter: Interpreter, env: Environment) -> Self {
        Self {
            interpreter,
            env,
            pending: Vec::new(),
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = if self.pending.is_empty() {
                format!("{} ", ">".bright_green())
            } else {
                format!("{} ", "...".bright_black())
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    if self.pending.is_empty() {
                        let input = line.trim();
                        if input.is_empty() {
                            continue;
                        }
                        let _ = rl.add_history_entry(input);

                        if input.starts_with('/') {
                            match self.handle_slash_command(input).await {
                                SlashResult::Continue => continue,
                                SlashResult::Quit => break,
                            }
                        }
                    }

                    match self.feed_line(&line).await {
                        LineOutcome::NeedMore { .. } => {}
                        LineOutcome::NotACommand(text) => {
                            println!("{} {}", "Not a tool command:".yellow(), text);
                        }
                        LineOutcome::Handled(result) => print_result(&result),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C drops a half-entered block
                    if !self.pending.is_empty() {
                        self.pending.clear();
                    }
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Feed one line of input
    ///
    /// Block-form commands are buffered until their end marker arrives.
    pub async fn feed_line(&mut self, line: &str) -> LineOutcome {
        debug!(%line, pending = %self.pending.len(), "ReplSession::feed_line: called");
        self.pending.push(line.to_string());
        let input = self.pending.join("\n");

        if let Some(end_marker) = self.interpreter.parser().pending_end_marker(&input) {
            return LineOutcome::NeedMore { end_marker };
        }
        self.pending.clear();

        match self.interpreter.handle(&input, &self.env).await {
            Some(result) => LineOutcome::Handled(result),
            None => LineOutcome::NotACommand(input.trim().to_string()),
        }
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "toolcmd Interactive REPL".bright_cyan().bold());
        println!("Workspace: {}", self.env.cwd.display());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/docs" => {
                println!("{}", self.interpreter.docs());
                SlashResult::Continue
            }
            "/state" => {
                let state = self.env.state_snapshot().await;
                if state.is_empty() {
                    println!("{}", "(no workspace state)".bright_black());
                }
                for (key, value) in state {
                    println!("{}={}", key.cyan(), value);
                }
                SlashResult::Continue
            }
            "/quit" | "/exit" | "/q" => SlashResult::Quit,
            _ => {
                println!("{} {}", "Unknown command:".red(), cmd);
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  {}   show this help", "/help".yellow());
        println!("  {}   print the tool catalog", "/docs".yellow());
        println!("  {}  print workspace state variables", "/state".yellow());
        println!("  {}   exit", "/quit".yellow());
        println!();
        println!("Anything else is parsed as a tool command, e.g. {}", "search_dir needle src".cyan());
    }
}

fn print_result(result: &ToolResult) {
    if result.is_error {
        println!("{} {}", "Error:".red(), result.content);
    } else {
        println!("{}", result.content);
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tools::ToolRegistry;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn session(root: std::path::PathBuf) -> ReplSession {
        let registry = ToolRegistry::standard(&Config::default()).unwrap();
        ReplSession::new(Interpreter::new(Arc::new(registry)), Environment::new(root))
    }

    #[tokio::test]
    async fn test_feed_line_runs_single_line_command() {
        let temp = tempdir().unwrap();
        let mut session = session(temp.path().to_path_buf());

        match session.feed_line("write_env GREETING hello").await {
            LineOutcome::Handled(result) => {
                assert!(!result.is_error);
                assert_eq!(result.content, "Set GREETING");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_feed_line_not_a_command() {
        let temp = tempdir().unwrap();
        let mut session = session(temp.path().to_path_buf());

        assert!(matches!(
            session.feed_line("git status").await,
            LineOutcome::NotACommand(ref text) if text == "git status"
        ));
    }

    #[tokio::test]
    async fn test_feed_line_buffers_block_until_marker() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "one\ntwo\n").unwrap();
        let mut session = session(temp.path().to_path_buf());

        assert!(matches!(session.feed_line("open a.txt").await, LineOutcome::Handled(_)));

        match session.feed_line("edit 2:2").await {
            LineOutcome::NeedMore { end_marker } => assert_eq!(end_marker, "end_of_edit"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(session.feed_line("    TWO").await, LineOutcome::NeedMore { .. }));
        assert!(matches!(session.feed_line("end_of_edit").await, LineOutcome::Handled(_)));

        assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "one\n    TWO\n");
    }
}
