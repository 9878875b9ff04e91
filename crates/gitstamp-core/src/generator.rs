//! [`Generator`] -- resolve git values, fill a template, write the result.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gitstamp_git::{CommitLogOptions, GitRunner};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::token::substitute;
use crate::values::TemplateValues;

/// Callback invoked with the path of every file the generator writes.
type WrittenHook = Box<dyn Fn(&Path)>;

/// Renders templates against the repository seen by its runner.
///
/// The generator holds the commit log options used when a caller does not
/// pass its own, and any hooks that should hear about written files (for
/// example an editor that needs to rescan its asset tree).
pub struct Generator<R> {
    runner: R,
    default_log: CommitLogOptions,
    hooks: Vec<WrittenHook>,
}

impl<R: GitRunner> Generator<R> {
    pub fn new(runner: R, default_log: CommitLogOptions) -> Self {
        Self {
            runner,
            default_log,
            hooks: Vec::new(),
        }
    }

    /// Register a hook that runs after each successful write.
    pub fn on_written(mut self, hook: impl Fn(&Path) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Resolve all four values, falling back to the default log options.
    pub fn resolve(&self, log: Option<&CommitLogOptions>) -> Result<TemplateValues> {
        let log = log.unwrap_or(&self.default_log);
        Ok(TemplateValues::resolve(&self.runner, log)?)
    }

    /// Fill `template` without touching the filesystem.
    pub fn render_to_string(
        &self,
        template: &str,
        log: Option<&CommitLogOptions>,
    ) -> Result<String> {
        let values = self.resolve(log)?;
        Ok(substitute(template, &values))
    }

    /// Fill `template` and write it to `output_path`.
    ///
    /// Every value is resolved before the filesystem is touched, so a git
    /// failure leaves any existing output untouched. Missing parent
    /// directories are created. The file is replaced atomically.
    pub fn render(
        &self,
        output_path: &Path,
        template: &str,
        log: Option<&CommitLogOptions>,
    ) -> Result<()> {
        let contents = self.render_to_string(template, log)?;
        write_atomic(output_path, &contents)?;
        debug!(path = %output_path.display(), bytes = contents.len(), "wrote rendered template");

        for hook in &self.hooks {
            hook(output_path);
        }
        Ok(())
    }
}

/// Write `contents` as UTF-8 (no byte-order mark) to `path`.
///
/// The data goes to a temporary file in the destination directory first and
/// is renamed over `path` once flushed, so readers see either the old file or
/// the complete new one. When `path` is a symlink the file it points to is
/// replaced and the link is left in place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = resolve_symlink(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| RenderError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    set_output_permissions(tmp.as_file(), &target).map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// The file a write to `path` should land in.
fn resolve_symlink(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }
    if let Ok(real) = fs::canonicalize(path) {
        return real;
    }
    // Dangling link: create the file it names.
    match fs::read_link(path) {
        Ok(dest) => match path.parent() {
            Some(parent) => parent.join(dest),
            None => dest,
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Temporary files are created owner-only; give the output the permissions
/// of the file it replaces, or ordinary read permissions for a new file.
fn set_output_permissions(file: &fs::File, path: &Path) -> std::io::Result<()> {
    if let Ok(meta) = fs::metadata(path) {
        return file.set_permissions(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}
