//! Path sandbox - confine path arguments to the workspace root
//!
//! Resolution is lexical: `.` and `..` components are folded without touching
//! the file system, so the check is cheap enough to run before every file
//! operation. Containment is tested component-wise, which keeps
//! `/workspace-evil` from passing as a child of `/workspace`.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{Environment, ToolError};

/// Resolve `input` against the workspace root of `env`
///
/// An empty input resolves to the root itself. Returns
/// [`ToolError::SandboxViolation`] when the result leaves the workspace; the
/// path is never clamped.
pub fn resolve(env: &Environment, input: &str) -> Result<PathBuf, ToolError> {
    debug!(cwd = ?env.cwd, %input, "sandbox::resolve: called");
    let root = workspace_root(&env.cwd);
    let candidate = if input.trim().is_empty() { "." } else { input };

    let joined = root.join(candidate);
    let resolved = normalize(&joined);

    if resolved.starts_with(&root) {
        debug!(?resolved, "sandbox::resolve: inside workspace");
        Ok(resolved)
    } else {
        debug!(?resolved, "sandbox::resolve: sandbox violation detected");
        Err(ToolError::SandboxViolation {
            path: input.to_string(),
            workspace: root,
        })
    }
}

/// Absolute, normalized form of a workspace root
pub fn workspace_root(cwd: &Path) -> PathBuf {
    let absolute = std::path::absolute(cwd).unwrap_or_else(|_| cwd.to_path_buf());
    normalize(&absolute)
}

/// Display form of `path` relative to the workspace root
pub fn display_path(env: &Environment, path: &Path) -> String {
    let root = workspace_root(&env.cwd);
    match path.strip_prefix(&root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().to_string(),
        Err(_) => path.to_string_lossy().to_string(),
    }
}

/// Fold `.` and `..` components without consulting the file system
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(root: &str) -> Environment {
        Environment::new(PathBuf::from(root))
    }

    #[test]
    fn test_relative_path_inside_workspace() {
        let result = resolve(&env("/ws"), "sub/dir").unwrap();
        assert_eq!(result, PathBuf::from("/ws/sub/dir"));
    }

    #[test]
    fn test_root_itself_is_allowed() {
        assert_eq!(resolve(&env("/ws"), "/ws").unwrap(), PathBuf::from("/ws"));
        assert_eq!(resolve(&env("/ws"), ".").unwrap(), PathBuf::from("/ws"));
    }

    #[test]
    fn test_empty_input_defaults_to_root() {
        assert_eq!(resolve(&env("/ws"), "").unwrap(), PathBuf::from("/ws"));
        assert_eq!(resolve(&env("/ws"), "   ").unwrap(), PathBuf::from("/ws"));
    }

    #[test]
    fn test_parent_escape_is_rejected() {
        let result = resolve(&env("/ws"), "../../etc/passwd");
        assert!(matches!(result, Err(ToolError::SandboxViolation { .. })));
    }

    #[test]
    fn test_absolute_path_outside_is_rejected() {
        let result = resolve(&env("/ws"), "/etc/passwd");
        assert!(matches!(result, Err(ToolError::SandboxViolation { .. })));
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_rejected() {
        let result = resolve(&env("/workspace"), "/workspace-evil/secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_dotdot_that_stays_inside_is_allowed() {
        let result = resolve(&env("/ws"), "a/b/../c").unwrap();
        assert_eq!(result, PathBuf::from("/ws/a/c"));
    }

    #[test]
    fn test_unnormalized_root() {
        let result = resolve(&env("/ws/sub/.."), "file.txt").unwrap();
        assert_eq!(result, PathBuf::from("/ws/file.txt"));
    }

    #[test]
    fn test_violation_reports_original_input() {
        let err = resolve(&env("/ws"), "../outside").unwrap_err();
        assert!(err.to_string().contains("../outside"));
        assert!(err.to_string().contains("path outside workspace"));
    }

    #[test]
    fn test_display_path() {
        let e = env("/ws");
        assert_eq!(display_path(&e, Path::new("/ws/src/lib.rs")), "src/lib.rs");
        assert_eq!(display_path(&e, Path::new("/ws")), ".");
    }
}
