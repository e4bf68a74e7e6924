//! Command parser - turn agent text into a resolved tool invocation
//!
//! Two command shapes are understood:
//!
//! - single-line: `tool [--flag value]* [positional]*`
//! - block: `tool <start>:<end>` followed by content lines and a line holding
//!   only the tool's end marker
//!
//! Input whose first word is not a registered tool parses to `None`; callers
//! treat it as ordinary text.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::tools::{ToolArgs, ToolDefinition, ToolError, ToolRegistry};

use super::tokenizer::tokenize;

/// Arguments that soak up leftover positional words, in preference order
const OVERFLOW_ARGUMENTS: [&str; 3] = ["query", "search_term", "content"];

/// A parsed command ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub name: String,
    pub args: ToolArgs,
}

/// Parses commands against the registered tool schemas
#[derive(Clone)]
pub struct Parser {
    registry: Arc<ToolRegistry>,
}

impl Parser {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// True when the first word of `line` names a registered tool
    pub fn is_tool_command(&self, line: &str) -> bool {
        first_word(line).is_some_and(|word| self.registry.has_tool(word))
    }

    /// Parse a raw command
    ///
    /// Returns `Ok(None)` for input that is not a tool command and
    /// [`ToolError::MissingArgument`] when a required argument cannot be
    /// resolved.
    pub fn parse(&self, raw: &str) -> Result<Option<Invocation>, ToolError> {
        debug!(%raw, "Parser::parse: called");
        let input = raw.trim();
        if input.is_empty() {
            debug!("Parser::parse: empty input");
            return Ok(None);
        }

        let lines: Vec<&str> = input.lines().collect();
        let first_line = lines[0];
        let Some(definition) = first_word(first_line).and_then(|name| self.registry.get(name)) else {
            debug!("Parser::parse: not a tool command");
            return Ok(None);
        };

        if let Some(end_name) = definition.end_name.as_deref()
            && lines.len() > 1
        {
            match find_end_marker(&lines, end_name) {
                Some(end) => {
                    debug!(name = %definition.name, %end, "Parser::parse: block form");
                    return parse_block(definition, first_line, &lines[1..end]).map(Some);
                }
                None => {
                    debug!(name = %definition.name, "Parser::parse: end marker missing, parsing first line only");
                    return parse_single_line(definition, first_line).map(Some);
                }
            }
        }

        parse_single_line(definition, input).map(Some)
    }

    /// End marker an interactive caller still has to read before parsing
    ///
    /// `None` when the input is not a block-form command or is already
    /// terminated.
    pub fn pending_end_marker(&self, input: &str) -> Option<String> {
        let input = input.trim();
        let lines: Vec<&str> = input.lines().collect();
        let definition = lines
            .first()
            .and_then(|line| first_word(line))
            .and_then(|name| self.registry.get(name))?;
        let end_name = definition.end_name.as_deref()?;

        match find_end_marker(&lines, end_name) {
            Some(_) => None,
            None => Some(end_name.to_string()),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }
}

fn first_word(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Index of the first line after the command line whose trimmed text is the marker
fn find_end_marker(lines: &[&str], end_name: &str) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == end_name)
        .map(|(i, _)| i)
}

fn parse_block(definition: &ToolDefinition, first_line: &str, body: &[&str]) -> Result<Invocation, ToolError> {
    let tokens = tokenize(first_line);
    let rest = tokens.get(1..).unwrap_or_default();

    let (start, end) = match rest.first().and_then(|t| t.split_once(':')) {
        Some((start, end)) => (Some(start.to_string()), Some(end.to_string())),
        None => (rest.first().cloned(), rest.get(1).cloned()),
    };

    let start = start
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::missing(&definition.name, "start_line"))?;
    let end = end
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::missing(&definition.name, "end_line"))?;

    let args = ToolArgs::new()
        .with("start_line", start)
        .with("end_line", end)
        .with("content", body.join("\n"));

    Ok(Invocation {
        name: definition.name.clone(),
        args,
    })
}

fn parse_single_line(definition: &ToolDefinition, text: &str) -> Result<Invocation, ToolError> {
    let tokens = tokenize(text);
    let rest = tokens.get(1..).unwrap_or_default();

    // Named flags first; everything else is positional, in order
    let mut args = ToolArgs::new();
    let mut flagged: HashSet<String> = HashSet::new();
    let mut positionals: Vec<String> = Vec::new();

    let mut i = 0;
    while i < rest.len() {
        match flag_name(&rest[i]) {
            Some(flag) => {
                match rest.get(i + 1) {
                    Some(value) if flag_name(value).is_none() => {
                        args.insert(flag, value.clone());
                        i += 2;
                    }
                    _ => {
                        args.insert(flag, "true");
                        i += 1;
                    }
                }
                flagged.insert(flag.to_string());
            }
            None => {
                positionals.push(rest[i].clone());
                i += 1;
            }
        }
    }

    // Fill the remaining declared arguments in schema order
    let mut remaining = positionals.into_iter();
    for arg in &definition.arguments {
        if args.contains(&arg.name) {
            continue;
        }
        match remaining.next() {
            Some(value) => args.insert(arg.name.clone(), value),
            None if arg.required => {
                debug!(tool = %definition.name, argument = %arg.name, "parse_single_line: missing required argument");
                return Err(ToolError::missing(&definition.name, &arg.name));
            }
            None => {}
        }
    }

    let leftover: Vec<String> = remaining.collect();
    if !leftover.is_empty() {
        let target = OVERFLOW_ARGUMENTS
            .iter()
            .find(|name| definition.has_argument(name) && !flagged.contains(**name));
        match target {
            Some(name) => {
                let joined = match args.get(name) {
                    Some(first) => format!("{} {}", first, leftover.join(" ")),
                    None => leftover.join(" "),
                };
                args.insert(*name, joined);
            }
            None => {
                debug!(tool = %definition.name, ?leftover, "parse_single_line: dropping extra positional arguments");
            }
        }
    }

    Ok(Invocation {
        name: definition.name.clone(),
        args,
    })
}

/// Flag name of a `--name` token; a token of only dashes is not a flag
fn flag_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix("--")?.trim_start_matches('-');
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Environment, Tool, ToolArgument};
    use async_trait::async_trait;

    struct SchemaTool(ToolDefinition);

    #[async_trait]
    impl Tool for SchemaTool {
        fn definition(&self) -> ToolDefinition {
            self.0.clone()
        }

        async fn execute(&self, _env: &Environment, _args: &ToolArgs) -> Result<String, ToolError> {
            Ok(String::new())
        }
    }

    fn parser() -> Parser {
        let mut registry = ToolRegistry::new();
        let tools = vec![
            ToolDefinition::new("search_dir", "search_dir <search_term> [<dir>]", "search a directory")
                .arg(ToolArgument::required("search_term", "string", "the term to search for"))
                .arg(ToolArgument::optional("dir", "string", "the directory to search")),
            ToolDefinition::new("search_file", "search_file <search_term>", "search the open file")
                .arg(ToolArgument::required("search_term", "string", "the term to search for")),
            ToolDefinition::new("open", "open <file_name>", "open a file")
                .arg(ToolArgument::required("file_name", "string", "file to open")),
            ToolDefinition::new("edit_range", "edit_range <start>:<end>", "replace lines")
                .arg(ToolArgument::required("start_line", "integer", "first line"))
                .arg(ToolArgument::required("end_line", "integer", "last line"))
                .arg(ToolArgument::required("content", "string", "replacement text"))
                .end_name("end_of_edit"),
            ToolDefinition::new("lookup", "lookup <search_term> [<query>]", "look something up")
                .arg(ToolArgument::required("search_term", "string", "primary term"))
                .arg(ToolArgument::optional("query", "string", "free-form query")),
            ToolDefinition::new("pr", "pr --title <t>", "open a PR")
                .arg(ToolArgument::required("title", "string", "title"))
                .arg(ToolArgument::optional("draft", "boolean", "draft")),
            ToolDefinition::new("scroll_down", "scroll_down", "scroll"),
        ];
        for def in tools {
            registry.register(SchemaTool(def)).unwrap();
        }
        Parser::new(Arc::new(registry))
    }

    fn args(pairs: &[(&str, &str)]) -> ToolArgs {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert_eq!(parser().parse("").unwrap(), None);
        assert_eq!(parser().parse("  \n\t ").unwrap(), None);
    }

    #[test]
    fn test_unknown_name_is_absent() {
        assert_eq!(parser().parse("not_a_tool arg1 arg2").unwrap(), None);
        assert_eq!(parser().parse("ls -la").unwrap(), None);
    }

    #[test]
    fn test_named_and_positional_are_order_independent() {
        let p = parser();
        let expected = Invocation {
            name: "search_dir".to_string(),
            args: args(&[("search_term", "needle"), ("dir", "src")]),
        };

        assert_eq!(p.parse("search_dir --dir src needle").unwrap(), Some(expected.clone()));
        assert_eq!(p.parse("search_dir needle --dir src").unwrap(), Some(expected));
    }

    #[test]
    fn test_positional_only() {
        let inv = parser().parse("search_dir needle src").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "needle"), ("dir", "src")]));
    }

    #[test]
    fn test_optional_argument_may_be_omitted() {
        let inv = parser().parse("search_dir needle").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "needle")]));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = parser().parse("open").unwrap_err();
        match err {
            ToolError::MissingArgument { tool, argument } => {
                assert_eq!(tool, "open");
                assert_eq!(argument, "file_name");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_overflow_joins_into_search_term() {
        let inv = parser().parse("search_file needle with spaces").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "needle with spaces")]));
    }

    #[test]
    fn test_overflow_appends_after_filled_positionals() {
        // search_term and dir are filled in schema order first; the rest joins search_term
        let inv = parser().parse("search_dir needle with spaces").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "needle spaces"), ("dir", "with")]));
    }

    #[test]
    fn test_overflow_prefers_query_over_search_term() {
        let inv = parser().parse("lookup tokio how to spawn tasks").unwrap().unwrap();
        assert_eq!(inv.args.get("search_term"), Some("tokio"));
        assert_eq!(inv.args.get("query"), Some("how to spawn tasks"));
    }

    #[test]
    fn test_overflow_skips_flagged_argument() {
        let inv = parser()
            .parse("search_dir --search_term fixed extra words")
            .unwrap()
            .unwrap();
        assert_eq!(inv.args.get("search_term"), Some("fixed"));
        assert_eq!(inv.args.get("dir"), Some("extra"));
    }

    #[test]
    fn test_quoted_positional() {
        let inv = parser().parse(r#"search_dir "two words" 'my dir'"#).unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "two words"), ("dir", "my dir")]));
    }

    #[test]
    fn test_boolean_flag() {
        let inv = parser().parse(r#"pr --draft --title "Fix it""#).unwrap().unwrap();
        assert_eq!(inv.args, args(&[("draft", "true"), ("title", "Fix it")]));
    }

    #[test]
    fn test_trailing_boolean_flag() {
        let inv = parser().parse("pr hello --draft").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("title", "hello"), ("draft", "true")]));
    }

    #[test]
    fn test_undeclared_flag_is_kept() {
        let inv = parser().parse("search_dir needle --case insensitive").unwrap().unwrap();
        assert_eq!(inv.args.get("case"), Some("insensitive"));
    }

    #[test]
    fn test_dash_only_tokens_are_positional() {
        let inv = parser().parse("search_dir -- x").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "--"), ("dir", "x")]));

        let inv = parser().parse("search_dir --- x").unwrap().unwrap();
        assert_eq!(inv.args, args(&[("search_term", "---"), ("dir", "x")]));
    }

    #[test]
    fn test_flag_name_strips_all_leading_dashes() {
        assert_eq!(flag_name("--dir"), Some("dir"));
        assert_eq!(flag_name("----dir"), Some("dir"));
        assert_eq!(flag_name("--"), None);
        assert_eq!(flag_name("----"), None);
        assert_eq!(flag_name("-d"), None);
    }

    #[test]
    fn test_zero_argument_tool() {
        let inv = parser().parse("scroll_down").unwrap().unwrap();
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_block_form_colon_range() {
        let input = "edit_range 10:15\nnew line one\nnew line two\nend_of_edit";
        let inv = parser().parse(input).unwrap().unwrap();

        assert_eq!(inv.name, "edit_range");
        assert_eq!(
            inv.args,
            args(&[
                ("start_line", "10"),
                ("end_line", "15"),
                ("content", "new line one\nnew line two"),
            ])
        );
    }

    #[test]
    fn test_block_form_separate_range_tokens() {
        let input = "edit_range 3 4\n    indented\n\nafter blank\n  end_of_edit  \ntrailing";
        let inv = parser().parse(input).unwrap().unwrap();

        assert_eq!(inv.args.get("start_line"), Some("3"));
        assert_eq!(inv.args.get("end_line"), Some("4"));
        assert_eq!(inv.args.get("content"), Some("    indented\n\nafter blank"));
        assert_eq!(inv.args.len(), 3);
    }

    #[test]
    fn test_block_form_empty_content() {
        let inv = parser().parse("edit_range 1:2\nend_of_edit").unwrap().unwrap();
        assert_eq!(inv.args.get("content"), Some(""));
    }

    #[test]
    fn test_block_form_missing_range() {
        let err = parser().parse("edit_range\nx\nend_of_edit").unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { ref argument, .. } if argument == "start_line"));

        let err = parser().parse("edit_range 7\nx\nend_of_edit").unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { ref argument, .. } if argument == "end_line"));
    }

    #[test]
    fn test_block_form_without_marker_parses_first_line_only() {
        let inv = parser().parse("edit_range 1 2 hello\nmore text").unwrap().unwrap();
        assert_eq!(
            inv.args,
            args(&[("start_line", "1"), ("end_line", "2"), ("content", "hello")])
        );
    }

    #[test]
    fn test_is_tool_command() {
        let p = parser();
        assert!(p.is_tool_command("search_dir needle"));
        assert!(p.is_tool_command("   open file.rs"));
        assert!(!p.is_tool_command("echo hi"));
        assert!(!p.is_tool_command(""));
    }

    #[test]
    fn test_pending_end_marker() {
        let p = parser();
        assert_eq!(p.pending_end_marker("edit_range 1:2"), Some("end_of_edit".to_string()));
        assert_eq!(p.pending_end_marker("edit_range 1:2\nfoo"), Some("end_of_edit".to_string()));
        assert_eq!(p.pending_end_marker("edit_range 1:2\nfoo\nend_of_edit"), None);
        assert_eq!(p.pending_end_marker("search_dir x"), None);
        assert_eq!(p.pending_end_marker("unknown"), None);
    }

    #[test]
    fn test_invocation_serializes_to_json() {
        let inv = parser().parse("search_dir needle src").unwrap().unwrap();
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "search_dir", "args": {"search_term": "needle", "dir": "src"}})
        );
    }
}
