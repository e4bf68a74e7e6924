//! Built-in tool families
//!
//! Each `load_*` step registers one family; `ToolRegistry::standard` runs
//! them all during startup.

mod create_pr;
mod edit;
mod env;
mod search;
mod web_search;
mod window;

pub use create_pr::CreatePrTool;
pub use edit::{CreateTool, EDIT_END_MARKER, EditTool};
pub use env::{ReadEnvTool, WriteEnvTool};
pub use search::{FindFileTool, SearchDirTool, SearchFileTool};
pub use web_search::{SearchProvider, WebSearchTool};
pub use window::{Direction, GotoTool, OpenTool, ScrollTool};

use crate::config::{GitConfig, SearchConfig, WebConfig, WindowConfig};

use super::{ToolError, ToolRegistry};

/// open, goto, scroll_down, scroll_up, create, edit
pub fn load_window_tools(registry: &mut ToolRegistry, window: &WindowConfig) -> Result<(), ToolError> {
    registry.register(OpenTool::new(window.clone()))?;
    registry.register(GotoTool::new(window.clone()))?;
    registry.register(ScrollTool::new(Direction::Down, window.clone()))?;
    registry.register(ScrollTool::new(Direction::Up, window.clone()))?;
    registry.register(CreateTool::new(window.clone()))?;
    registry.register(EditTool::new(window.clone()))?;
    Ok(())
}

/// search_dir, search_file, find_file
pub fn load_search_tools(registry: &mut ToolRegistry, search: &SearchConfig) -> Result<(), ToolError> {
    registry.register(SearchDirTool::new(search.clone()))?;
    registry.register(SearchFileTool::new(search.clone()))?;
    registry.register(FindFileTool::new(search.clone()))?;
    Ok(())
}

/// read_env, write_env
pub fn load_env_tools(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register(ReadEnvTool)?;
    registry.register(WriteEnvTool)?;
    Ok(())
}

/// web_search
pub fn load_web_tools(registry: &mut ToolRegistry, web: &WebConfig) -> Result<(), ToolError> {
    registry.register(WebSearchTool::new(web.clone()))
}

/// create_pr
pub fn load_git_tools(registry: &mut ToolRegistry, git: &GitConfig) -> Result<(), ToolError> {
    registry.register(CreatePrTool::new(git.clone()))
}
