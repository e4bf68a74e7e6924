//! Environment - caller-supplied execution context for tools

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::sandbox::workspace_root;

/// Key/value state shared by every tool call in the process, keyed by workspace root
///
/// Commands run one at a time, so a single lock around the whole map is enough.
#[derive(Clone, Default)]
pub struct StateStore {
    workspaces: Arc<Mutex<HashMap<PathBuf, BTreeMap<String, String>>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, workspace: &Path, key: &str) -> Option<String> {
        let workspaces = self.workspaces.lock().await;
        workspaces.get(workspace).and_then(|vars| vars.get(key).cloned())
    }

    pub async fn set(&self, workspace: &Path, key: &str, value: &str) {
        let mut workspaces = self.workspaces.lock().await;
        workspaces
            .entry(workspace.to_path_buf())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub async fn remove(&self, workspace: &Path, key: &str) -> Option<String> {
        let mut workspaces = self.workspaces.lock().await;
        workspaces.get_mut(workspace).and_then(|vars| vars.remove(key))
    }

    /// All variables of one workspace, sorted by key
    pub async fn snapshot(&self, workspace: &Path) -> BTreeMap<String, String> {
        let workspaces = self.workspaces.lock().await;
        workspaces.get(workspace).cloned().unwrap_or_default()
    }
}

/// Execution context handed to every tool
///
/// `cwd` is the workspace root. The interpreter never changes it; tools only
/// touch the shared [`StateStore`] through the accessors below.
#[derive(Clone)]
pub struct Environment {
    /// Workspace root - all path arguments are confined here
    pub cwd: PathBuf,

    state: StateStore,
}

impl Environment {
    /// Create an environment with its own state store
    pub fn new(cwd: PathBuf) -> Self {
        debug!(?cwd, "Environment::new: called");
        Self {
            cwd,
            state: StateStore::new(),
        }
    }

    /// Create an environment sharing an existing state store
    pub fn with_store(cwd: PathBuf, state: StateStore) -> Self {
        debug!(?cwd, "Environment::with_store: called");
        Self { cwd, state }
    }

    pub fn store(&self) -> &StateStore {
        &self.state
    }

    pub async fn get_state(&self, key: &str) -> Option<String> {
        self.state.get(&workspace_root(&self.cwd), key).await
    }

    pub async fn set_state(&self, key: &str, value: &str) {
        debug!(%key, "Environment::set_state: called");
        self.state.set(&workspace_root(&self.cwd), key, value).await;
    }

    pub async fn remove_state(&self, key: &str) -> Option<String> {
        self.state.remove(&workspace_root(&self.cwd), key).await
    }

    pub async fn state_snapshot(&self) -> BTreeMap<String, String> {
        self.state.snapshot(&workspace_root(&self.cwd)).await
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").field("cwd", &self.cwd).finish()
    }
}
