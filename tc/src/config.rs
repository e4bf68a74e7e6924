//! toolcmd configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace the tools are confined to
    pub workspace: WorkspaceConfig,

    /// Windowed file viewer
    pub window: WindowConfig,

    /// File search limits
    pub search: SearchConfig,

    /// Web search
    pub web: WebConfig,

    /// Pull request creation
    pub git: GitConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .toolcmd.yml
        let local_config = PathBuf::from(".toolcmd.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/toolcmd/toolcmd.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("toolcmd").join("toolcmd.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Workspace root; relative paths resolve against the process directory
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Windowed file viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Lines shown per window
    pub lines: usize,

    /// Lines kept on screen when scrolling
    pub overlap: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { lines: 100, overlap: 2 }
    }
}

impl WindowConfig {
    /// Distance moved by one scroll
    pub fn scroll_step(&self) -> usize {
        self.lines.saturating_sub(self.overlap).max(1)
    }
}

/// File search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Refuse to list more matching files than this
    #[serde(rename = "max-files")]
    pub max_files: usize,

    /// Refuse to list more matching lines than this
    #[serde(rename = "max-matches")]
    pub max_matches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_files: 100,
            max_matches: 500,
        }
    }
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Results returned per query
    #[serde(rename = "max-results")]
    pub max_results: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_results: 5,
        }
    }
}

/// Pull request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// GitHub CLI executable
    #[serde(rename = "gh-command")]
    pub gh_command: String,

    /// Command timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            gh_command: "gh".to_string(),
            timeout_ms: 120_000,
        }
    }
}
