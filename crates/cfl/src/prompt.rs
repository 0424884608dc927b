//! Interactive questions on the terminal.

use console::Term;

use crate::error::CliError;

/// Asks the user for values.
pub(crate) trait Prompt {
    /// Ask for a value. `shown` is displayed as the current value unless
    /// `secret`. Returns the trimmed answer, empty when the user just
    /// pressed Enter.
    fn ask(&mut self, label: &str, shown: Option<&str>, secret: bool) -> Result<String, CliError>;

    /// Yes/no question; an empty answer picks `default`.
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool, CliError> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{label} [{hint}]"), None, false)?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => {}
            }
        }
    }
}

/// Prompts on stderr, reading from the terminal.
pub(crate) struct TermPrompt {
    term: Term,
}

impl TermPrompt {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Prompt for TermPrompt {
    fn ask(&mut self, label: &str, shown: Option<&str>, secret: bool) -> Result<String, CliError> {
        match shown {
            Some(value) if !secret && !value.is_empty() => {
                self.term.write_str(&format!("{label} [{value}]: "))?;
            }
            _ => self.term.write_str(&format!("{label}: "))?,
        }

        let answer = if secret {
            self.term.read_secure_line()?
        } else {
            self.term.read_line()?
        };
        Ok(answer.trim().to_owned())
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned answers and records the questions asked.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        answers: VecDeque<String>,
        pub(crate) asked: Vec<(String, Option<String>)>,
    }

    impl ScriptedPrompt {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| (*a).to_owned()).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(
            &mut self,
            label: &str,
            shown: Option<&str>,
            _secret: bool,
        ) -> Result<String, CliError> {
            self.asked.push((label.to_owned(), shown.map(str::to_owned)));
            Ok(self.answers.pop_front().unwrap_or_default())
        }
    }

    #[test]
    fn test_confirm_default_and_retry() {
        let mut prompt = ScriptedPrompt::new(&["", "maybe", "n"]);

        assert!(prompt.confirm("Publish now?", true).unwrap());
        assert!(!prompt.confirm("Publish now?", true).unwrap());
        assert_eq!(prompt.asked.len(), 3);
        assert_eq!(prompt.asked[0].0, "Publish now? [Y/n]");
    }
}
