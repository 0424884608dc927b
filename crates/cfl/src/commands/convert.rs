//! `confluence convert` command and the conversion options shared with
//! `create` and `update`.

use std::path::{Path, PathBuf};

use cfl_convert::{PandocConverter, render_markdown_file, split_args};
use clap::{Args, ValueEnum};

use crate::context::Context;
use crate::error::CliError;

/// Markdown converter backend.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Converter {
    /// External `pandoc -f gfm -t html`.
    #[default]
    Pandoc,
    /// In-process pulldown-cmark renderer.
    Builtin,
}

/// Converter backend options.
#[derive(Args, Debug, Clone)]
pub(crate) struct ConverterArgs {
    /// Extra args passed to pandoc (shell-quoted).
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub(crate) pandoc_args: String,

    /// Converter backend.
    #[arg(long, value_enum, default_value_t)]
    pub(crate) converter: Converter,

    /// Pandoc executable.
    #[arg(long, env = "CONFLUENCE_PANDOC", default_value = "pandoc")]
    pub(crate) pandoc: String,
}

impl ConverterArgs {
    /// Convert `input` to `output` and return the HTML.
    pub(crate) fn convert(&self, input: &Path, output: &Path) -> Result<String, CliError> {
        let html = match self.converter {
            Converter::Pandoc => {
                let extra = split_args(&self.pandoc_args)?;
                PandocConverter::new(&self.pandoc).convert(input, output, &extra)?
            }
            Converter::Builtin => render_markdown_file(input, output)?,
        };
        Ok(html)
    }

    /// Backend name for progress lines.
    pub(crate) fn label(&self) -> &str {
        match self.converter {
            Converter::Pandoc => &self.pandoc,
            Converter::Builtin => "builtin",
        }
    }
}

/// Markdown input and HTML output options.
#[derive(Args, Debug, Clone)]
pub(crate) struct ConversionArgs {
    /// Input Markdown file.
    #[arg(long)]
    pub(crate) input_md_file: PathBuf,

    /// Output HTML file path.
    #[arg(long)]
    pub(crate) html_file: PathBuf,

    #[command(flatten)]
    pub(crate) backend: ConverterArgs,
}

impl ConversionArgs {
    /// Convert the input file, write the HTML file and return its content.
    pub(crate) fn run(&self) -> Result<String, CliError> {
        if !self.input_md_file.is_file() {
            return Err(CliError::Validation(format!(
                "input file not found: {}",
                self.input_md_file.display()
            )));
        }
        self.backend.convert(&self.input_md_file, &self.html_file)
    }

    /// Convert with a progress line on stderr.
    pub(crate) fn run_reporting(&self, ctx: &Context) -> Result<String, CliError> {
        ctx.output.info(&format!(
            "Converting: {} -> {} ({})",
            self.input_md_file.display(),
            self.html_file.display(),
            self.backend.label()
        ));
        self.run()
    }
}

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    conversion: ConversionArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        self.conversion.run_reporting(ctx)?;
        ctx.output
            .success(&format!("Wrote {}", self.conversion.html_file.display()));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    pub(crate) fn backend(converter: Converter) -> ConverterArgs {
        ConverterArgs {
            pandoc_args: String::new(),
            converter,
            pandoc: "cfl-no-such-pandoc".to_owned(),
        }
    }

    fn args(dir: &TempDir, converter: Converter) -> ConversionArgs {
        ConversionArgs {
            input_md_file: dir.path().join("doc.md"),
            html_file: dir.path().join("out/doc.html"),
            backend: backend(converter),
        }
    }

    #[test]
    fn test_builtin_conversion() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.md"), "# Notes\n").unwrap();

        let html = args(&dir, Converter::Builtin).run().unwrap();

        assert_eq!(html, "<h1>Notes</h1>\n");
        assert!(dir.path().join("out/doc.html").is_file());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            args(&dir, Converter::Builtin).run(),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_pandoc() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.md"), "# Notes\n").unwrap();

        let err = args(&dir, Converter::Pandoc).run().unwrap_err();

        assert!(matches!(
            err,
            CliError::Convert(cfl_convert::ConvertError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn test_bad_pandoc_args() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.md"), "# Notes\n").unwrap();
        let mut args = args(&dir, Converter::Pandoc);
        args.backend.pandoc_args = "--title 'unterminated".to_owned();

        assert!(matches!(
            args.run(),
            Err(CliError::Convert(cfl_convert::ConvertError::InvalidArgs(_)))
        ));
    }
}
