//! `confluence config` commands.

use cfl_config::{LoadedProfile, ProfileSource};
use clap::Subcommand;
use serde_json::json;

use crate::context::Context;
use crate::error::CliError;

/// Inspect and diagnose configuration.
#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the selected profile (token redacted) and where it came from.
    Show,
    /// Validate required keys; exits with code 2 on problems.
    Doctor,
}

impl ConfigCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let loaded = ctx.loaded()?;
        match self {
            Self::Show => show(ctx, loaded),
            Self::Doctor => doctor(ctx, loaded),
        }
    }
}

fn source_label(source: ProfileSource) -> &'static str {
    match source {
        ProfileSource::File => "profile",
        ProfileSource::DefaultFallback => "default profile (fallback)",
        ProfileSource::Empty => "none",
    }
}

fn show(ctx: &Context, loaded: &LoadedProfile) -> Result<(), CliError> {
    let redacted = loaded.profile.redacted();
    if ctx.json {
        return Ok(ctx.output.json(&json!({
            "profile": loaded.name,
            "source": source_label(loaded.source),
            "config_path": loaded.path,
            "values": redacted,
        }))?);
    }

    ctx.output.highlight("=== Confluence CLI config (redacted) ===");
    ctx.output.info(&format!(
        "Source: {} [{}]",
        source_label(loaded.source),
        loaded.name
    ));
    ctx.output.info(&format!("Path  : {}", loaded.path.display()));
    ctx.output.json(&redacted)?;
    Ok(())
}

fn doctor(ctx: &Context, loaded: &LoadedProfile) -> Result<(), CliError> {
    let problems = loaded.profile.problems();

    if problems.is_empty() {
        ctx.output.success("Config OK");
        ctx.output
            .info(&format!("Loaded from: {}", loaded.path.display()));
        return Ok(());
    }

    ctx.output.error("Config issues found:");
    for problem in &problems {
        ctx.output.warning(&format!(" - {problem}"));
    }
    ctx.output.info("\nRun: confluence config show");
    Err(CliError::ConfigProblems(problems.len()))
}
