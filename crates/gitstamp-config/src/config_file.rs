//! Discovery of the `.gitstamp.yaml` file.
//!
//! The file normally lives at the root of the repository, next to `.git`.
//! [`find_config_file`] checks the `GITSTAMP_CONFIG` environment variable
//! first and then walks up the directory tree from a starting point.

use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

/// Environment variable naming a configuration file explicitly.
pub const CONFIG_ENV: &str = "GITSTAMP_CONFIG";

/// [`CONFIG_ENV`] without the `GITSTAMP_` prefix, as figment sees it.
pub(crate) const CONFIG_ENV_KEY: &str = "config";

/// Find the configuration file for `start`.
///
/// `GITSTAMP_CONFIG` wins when it names an existing file; otherwise the
/// directory tree is searched with [`discover_config_file`].
///
/// # Examples
///
/// ```no_run
/// use gitstamp_config::config_file::find_config_file;
/// use std::path::Path;
///
/// if let Some(path) = find_config_file(Path::new(".")) {
///     println!("Using {}", path.display());
/// }
/// ```
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let env_path = PathBuf::from(env_path);
        if env_path.is_file() {
            return Some(env_path);
        }
    }

    discover_config_file(start)
}

/// Walk up from `start` looking for `.gitstamp.yaml`.
///
/// Returns `None` when the filesystem root is reached without finding one.
pub fn discover_config_file(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
