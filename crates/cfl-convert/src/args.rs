//! Shell-style argument splitting for `--pandoc-args`.

use crate::ConvertError;

/// Split a string into arguments the way a POSIX shell would.
///
/// Quotes and backslash escapes follow `sh`; no variable or glob expansion
/// is performed.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidArgs`] on an unterminated quote or a
/// trailing backslash.
pub fn split_args(input: &str) -> Result<Vec<String>, ConvertError> {
    shlex::split(input).ok_or_else(|| {
        ConvertError::InvalidArgs(format!("unbalanced quoting in {input:?}"))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(
            split_args("  --toc   --standalone ").unwrap(),
            vec!["--toc", "--standalone"]
        );
        assert!(split_args("").unwrap().is_empty());
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split_args(r#"--metadata title="My Doc" --css 'a b.css'"#).unwrap(),
            vec!["--metadata", "title=My Doc", "--css", "a b.css"]
        );
    }

    #[test]
    fn test_split_escapes() {
        assert_eq!(
            split_args(r#"a\ b "say \"hi\"" 'no\escape'"#).unwrap(),
            vec!["a b", r#"say "hi""#, r"no\escape"]
        );
    }

    #[test]
    fn test_split_unterminated() {
        assert!(matches!(
            split_args("--title 'oops"),
            Err(ConvertError::InvalidArgs(_))
        ));
        assert!(matches!(split_args(r#""oops"#), Err(ConvertError::InvalidArgs(_))));
        assert!(matches!(split_args("oops\\"), Err(ConvertError::InvalidArgs(_))));
    }
}
