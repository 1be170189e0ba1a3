use anyhow::Context;
use ninja_core::paths::{ResourceDirectories, NINJA_DIR};
use std::path::{Path, PathBuf};

/// The workspace being worked on and the directories resolved for it.
pub struct Workspace {
    pub root: PathBuf,
    pub dirs: ResourceDirectories,
}

/// Resolve the workspace root.
///
/// Priority:
/// 1. `--root` flag / `CP_NINJA_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.cp-ninja/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd, NINJA_DIR)
        .or_else(|| find_upward(&cwd, ".git"))
        .unwrap_or(cwd)
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// `--home` / `CP_NINJA_HOME` overrides the global root; otherwise
/// `~/.cp-ninja` is used.
pub fn resolve_dirs(root: &Path, home: Option<&Path>) -> anyhow::Result<ResourceDirectories> {
    match home {
        Some(global) => Ok(ResourceDirectories::with_global_root(global, root)),
        None => ResourceDirectories::for_workspace(root).context("failed to locate global directory"),
    }
}
