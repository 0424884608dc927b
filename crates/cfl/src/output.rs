//! Colored terminal output utilities.
//!
//! Messages go to stderr; command results (lists, JSON, page text) go to
//! stdout so they can be piped.

use console::{Style, Term};
use serde::Serialize;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    quiet: bool,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    ///
    /// With `quiet`, info and success messages are suppressed; warnings,
    /// errors and data still print.
    #[must_use]
    pub(crate) fn new(quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            quiet,
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        if !self.quiet {
            let _ = self.term.write_line(msg);
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        if !self.quiet {
            let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
        }
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        if !self.quiet {
            let _ = self
                .term
                .write_line(&self.cyan_bold.apply_to(msg).to_string());
        }
    }

    /// Print a result line to stdout.
    pub(crate) fn data(&self, line: &str) {
        let _ = self.stdout.write_line(line);
    }

    /// Print a highlighted result line to stdout.
    pub(crate) fn data_heading(&self, line: &str) {
        let _ = self
            .stdout
            .write_line(&self.cyan_bold.apply_to(line).to_string());
    }

    /// Print a value as pretty JSON to stdout.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), serde_json::Error> {
        let text = serde_json::to_string_pretty(value)?;
        self.data(&text);
        Ok(())
    }
}
