//! Conversion through an external `pandoc` process.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::ConvertError;

/// Default converter program.
const DEFAULT_PROGRAM: &str = "pandoc";

/// Runs `pandoc <input> -f gfm -t html -o <output> [extra args]`.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl PandocConverter {
    /// Converter invoking `program` instead of `pandoc` from `PATH`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this converter runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Convert a GitHub-flavored Markdown file to an HTML file.
    ///
    /// The output's parent directory is created first. Returns the generated
    /// HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ToolNotFound`] when the program is missing,
    /// [`ConvertError::Failed`] on a non-zero exit and
    /// [`ConvertError::MissingOutput`] when no output file appears.
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        extra_args: &[String],
    ) -> Result<String, ConvertError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(
            "Converting {} -> {} with {}",
            input.display(),
            output.display(),
            self.program
        );
        debug!("Extra converter args: {extra_args:?}");

        let result = Command::new(&self.program)
            .arg(input)
            .args(["-f", "gfm", "-t", "html", "-o"])
            .arg(output)
            .args(extra_args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ConvertError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => ConvertError::Io(e),
            })?;

        if !result.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }

        if !output.exists() {
            return Err(ConvertError::MissingOutput(output.to_path_buf()));
        }

        Ok(std::fs::read_to_string(output)?)
    }
}
