use std::path::PathBuf;

/// Conversion error.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Converter binary is not installed or not on `PATH`.
    #[error("{program} not found; install it or pass --converter builtin")]
    ToolNotFound {
        /// Program that could not be spawned.
        program: String,
    },
    /// Converter exited with a non-zero status.
    #[error("{program} failed with {status}: {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// Converter succeeded but did not write the output file.
    #[error("converter did not produce {}", .0.display())]
    MissingOutput(PathBuf),
    /// Extra arguments could not be split.
    #[error("invalid converter arguments: {0}")]
    InvalidArgs(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
