//! CLI error types.

use cfl_config::ConfigError;
use cfl_confluence::ConfluenceError;
use cfl_convert::ConvertError;
use cfl_llm::LlmError;

/// Exit code for a failed command.
const EXIT_FAILURE: i32 = 1;

/// Exit code when a command refuses to act (page exists, config problems).
const EXIT_REFUSED: i32 = 2;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("page already exists: {title} [id:{id}]")]
    PageExists { title: String, id: String },

    #[error("no free title after {attempts} suffixes for \"{title}\"")]
    NoFreeTitle { title: String, attempts: u32 },

    #[error("configuration has {0} problem(s)")]
    ConfigProblems(usize),
}

impl CliError {
    /// Process exit code for this error.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::PageExists { .. } | Self::NoFreeTitle { .. } | Self::ConfigProblems(_) => {
                EXIT_REFUSED
            }
            _ => EXIT_FAILURE,
        }
    }
}
