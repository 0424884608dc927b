//! Opening links in the user's browser.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::CliError;

/// Open `url` with the platform's default handler.
pub(crate) fn open(url: &str) -> Result<(), CliError> {
    debug!("Opening {url}");
    let mut command = opener(url);
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::Validation(format!(
            "could not open browser ({status}); open manually: {url}"
        )))
    }
}

fn opener(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(url);
        command
    }
    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(url);
        command
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}
