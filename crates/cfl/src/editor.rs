//! Editing text in the user's `$VISUAL` / `$EDITOR`.

use std::process::Command;

use cfl_convert::split_args;
use tracing::debug;

use crate::error::CliError;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

/// Lets the user revise a block of text.
pub(crate) trait Editor {
    /// Open `text` in a file named like `name`; return the saved content.
    fn edit(&mut self, text: &str, name: &str) -> Result<String, CliError>;
}

/// Runs an external editor on a temporary file.
pub(crate) struct CommandEditor {
    command: Vec<String>,
}

impl CommandEditor {
    /// `$VISUAL`, then `$EDITOR`, then `vi` (`notepad` on Windows).
    pub(crate) fn from_env() -> Result<Self, CliError> {
        let configured = ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        let command = split_args(configured.as_deref().unwrap_or(FALLBACK_EDITOR))?;
        if command.is_empty() {
            return Err(CliError::Validation("editor command is empty".to_owned()));
        }
        Ok(Self { command })
    }
}

impl Editor for CommandEditor {
    fn edit(&mut self, text: &str, name: &str) -> Result<String, CliError> {
        let (stem, extension) = name.rsplit_once('.').unwrap_or((name, "md"));
        let file = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        std::fs::write(file.path(), text)?;

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| CliError::Validation("editor command is empty".to_owned()))?;
        debug!("running {program} on {}", file.path().display());
        let status = Command::new(program).args(args).arg(file.path()).status()?;
        if !status.success() {
            return Err(CliError::Validation(format!(
                "editor '{program}' exited with {status}"
            )));
        }

        Ok(std::fs::read_to_string(file.path())?)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    /// Records what it was given and returns replacements in order; with
    /// none left, returns the text unchanged.
    #[derive(Default)]
    pub(crate) struct ScriptedEditor {
        pub(crate) replies: Vec<String>,
        pub(crate) opened: Vec<(String, String)>,
    }

    impl Editor for ScriptedEditor {
        fn edit(&mut self, text: &str, name: &str) -> Result<String, CliError> {
            self.opened.push((name.to_owned(), text.to_owned()));
            if self.replies.is_empty() {
                Ok(text.to_owned())
            } else {
                Ok(self.replies.remove(0))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn editor(script: &str) -> CommandEditor {
        CommandEditor {
            command: vec!["sh".to_owned(), "-c".to_owned(), script.to_owned()],
        }
    }

    #[test]
    fn test_edit_returns_saved_file() {
        let mut editor = editor(r#"case "$0" in *.md) echo edited > "$0" ;; esac"#);

        assert_eq!(editor.edit("# Draft\n", "draft.md").unwrap(), "edited\n");
    }

    #[test]
    fn test_edit_unchanged() {
        assert_eq!(editor("true").edit("keep\n", "outline.md").unwrap(), "keep\n");
    }

    #[test]
    fn test_edit_failure() {
        assert!(matches!(
            editor("exit 3").edit("x", "draft.md"),
            Err(CliError::Validation(_))
        ));
    }
}
