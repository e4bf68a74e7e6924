//! Search tools - search_dir, search_file, find_file
//!
//! Text search runs on the ripgrep libraries with fixed-string matching;
//! directory walks skip hidden entries such as `.git`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::sinks::UTF8;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::SearchConfig;
use crate::tools::sandbox::{self, display_path};
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

use super::window::current_file;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

/// Regular files under `root`, sorted for stable output
fn walk_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

fn build_matcher(term: &str) -> Result<RegexMatcher, String> {
    RegexMatcherBuilder::new()
        .fixed_strings(true)
        .build(term)
        .map_err(|e| format!("Error: invalid search term: {}", e))
}

/// Matching lines of one file as (line number, text)
fn search_path(matcher: &RegexMatcher, path: &Path) -> Vec<(u64, String)> {
    let mut hits = Vec::new();
    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::quit(b'\x00'))
        .line_number(true)
        .build();

    let result = searcher.search_path(
        matcher,
        path,
        UTF8(|line_num, line| {
            hits.push((line_num, line.trim_end().to_string()));
            Ok(true)
        }),
    );
    if let Err(e) = result {
        // Unreadable or non-UTF8 files are skipped
        debug!(?path, %e, "search_path: skipping file");
    }
    hits
}

/// Count matches per file in a directory
pub struct SearchDirTool {
    config: SearchConfig,
}

impl SearchDirTool {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for SearchDirTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "search_dir",
            "search_dir <search_term> [<dir>]",
            "searches for search_term in all files in dir. If dir is not provided, searches in the current directory",
        )
        .arg(ToolArgument::required("search_term", "string", "the term to search for"))
        .arg(ToolArgument::optional(
            "dir",
            "string",
            "the directory to search in (if not provided, searches in the current directory)",
        ))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "SearchDirTool::execute: called");
        let term = args.require("search_dir", "search_term")?;
        let dir = args.get("dir").unwrap_or(".");

        let root = match sandbox::resolve(env, dir) {
            Ok(p) => p,
            Err(e) => return Ok(format!("Error: {}", e)),
        };
        if !root.is_dir() {
            return Ok(format!("Directory {} not found", dir));
        }

        let matcher = match build_matcher(term) {
            Ok(m) => m,
            Err(msg) => return Ok(msg),
        };

        let mut counts: Vec<(String, usize)> = Vec::new();
        for path in walk_files(&root) {
            let hits = search_path(&matcher, &path).len();
            if hits > 0 {
                counts.push((display_path(env, &path), hits));
            }
        }
        debug!(files = %counts.len(), "SearchDirTool::execute: search complete");

        if counts.is_empty() {
            return Ok(format!("No matches found for \"{}\" in {}", term, dir));
        }
        if counts.len() > self.config.max_files {
            return Ok(format!(
                "More than {} files matched for \"{}\" in {}. Please narrow your search.",
                self.config.max_files, term, dir
            ));
        }

        let total: usize = counts.iter().map(|(_, n)| n).sum();
        let mut output = vec![format!("Found {} matches for \"{}\" in {}:", total, term, dir)];
        output.extend(counts.iter().map(|(file, n)| format!("{} ({} matches)", file, n)));
        output.push(format!("End of matches for \"{}\" in {}", term, dir));
        Ok(output.join("\n"))
    }
}

/// List matching lines of one file
pub struct SearchFileTool {
    config: SearchConfig,
}

impl SearchFileTool {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for SearchFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "search_file",
            "search_file <search_term> [<file>]",
            "searches for search_term in file. If file is not provided, searches in the current open file",
        )
        .arg(ToolArgument::required("search_term", "string", "the term to search for"))
        .arg(ToolArgument::optional(
            "file",
            "string",
            "the file to search in (if not provided, searches in the current open file)",
        ))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "SearchFileTool::execute: called");
        let term = args.require("search_file", "search_term")?;

        let path = match args.get("file") {
            Some(file) => match sandbox::resolve(env, file) {
                Ok(p) => p,
                Err(e) => return Ok(format!("Error: {}", e)),
            },
            None => match current_file(env).await {
                Ok(p) => p,
                Err(msg) => return Ok(msg),
            },
        };
        let shown = display_path(env, &path);
        if !path.is_file() {
            return Ok(format!("Error: File {} not found", shown));
        }

        let matcher = match build_matcher(term) {
            Ok(m) => m,
            Err(msg) => return Ok(msg),
        };

        let hits = search_path(&matcher, &path);
        if hits.is_empty() {
            return Ok(format!("No matches found for \"{}\" in {}", term, shown));
        }
        if hits.len() > self.config.max_matches {
            return Ok(format!(
                "More than {} lines matched for \"{}\" in {}. Please narrow your search.",
                self.config.max_matches, term, shown
            ));
        }

        let mut output = vec![format!("Found {} matches for \"{}\" in {}:", hits.len(), term, shown)];
        output.extend(hits.iter().map(|(n, line)| format!("Line {}:{}", n, line)));
        output.push(format!("End of matches for \"{}\" in {}", term, shown));
        Ok(output.join("\n"))
    }
}

/// Find files by name or glob
pub struct FindFileTool {
    config: SearchConfig,
}

impl FindFileTool {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for FindFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "find_file",
            "find_file <file_name> [<dir>]",
            "finds all files with the given name or pattern in dir. If dir is not provided, searches in the current directory",
        )
        .arg(ToolArgument::required(
            "file_name",
            "string",
            "the name of the file or pattern to search for. supports shell-style wildcards (e.g. *.py)",
        ))
        .arg(ToolArgument::optional(
            "dir",
            "string",
            "the directory to search in (if not provided, searches in the current directory)",
        ))
    }

    async fn execute(&self, env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "FindFileTool::execute: called");
        let name = args.require("find_file", "file_name")?;
        let dir = args.get("dir").unwrap_or(".");

        let root = match sandbox::resolve(env, dir) {
            Ok(p) => p,
            Err(e) => return Ok(format!("Error: {}", e)),
        };
        if !root.is_dir() {
            return Ok(format!("Directory {} not found", dir));
        }

        let pattern = match glob::Pattern::new(name) {
            Ok(p) => p,
            Err(e) => return Ok(format!("Error: invalid file pattern: {}", e)),
        };

        let found: Vec<String> = walk_files(&root)
            .into_iter()
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| pattern.matches(n)))
            .map(|p| display_path(env, &p))
            .collect();
        debug!(found = %found.len(), "FindFileTool::execute: walk complete");

        if found.is_empty() {
            return Ok(format!("No matches found for \"{}\" in {}", name, dir));
        }
        if found.len() > self.config.max_files {
            return Ok(format!(
                "More than {} files matched for \"{}\" in {}. Please narrow your search.",
                self.config.max_files, name, dir
            ));
        }

        let mut output = vec![format!("Found {} matches for \"{}\" in {}:", found.len(), name, dir)];
        output.extend(found);
        Ok(output.join("\n"))
    }
}
