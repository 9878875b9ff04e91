//! Render error types.

use std::path::PathBuf;

use gitstamp_git::GitError;

/// Errors that can occur while rendering a template to disk.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A git value could not be resolved. Launch failures always land here;
    /// non-zero exits and timeouts only when the runner opts into them.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The output file or one of its parent directories could not be
    /// created or written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized `Result` type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
