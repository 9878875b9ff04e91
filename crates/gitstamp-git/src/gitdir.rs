//! Repository discovery on the filesystem.
//!
//! These helpers never shell out; they look for a `.git` entry (directory
//! for a normal checkout, file for worktrees and submodules).

use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a `.git` directory or file.
///
/// Returns the working tree root (the parent of `.git`), or `None` when the
/// filesystem root is reached first.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}
