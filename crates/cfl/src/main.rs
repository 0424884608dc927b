//! Confluence CLI.
//!
//! Provides commands for:
//! - `auth login`: Store credentials in a config profile
//! - `config show` / `config doctor`: Inspect and validate the profile
//! - `convert`: Convert Markdown to HTML without uploading
//! - `create` / `update`: Publish Markdown as a Confluence page
//! - `author`: Draft a page with a self-hosted LLM and publish it
//! - `browse`: List, search, open, print and view pages, or explore them
//!   in a full-screen browser

mod browser;
mod commands;
mod context;
mod editor;
mod error;
mod output;
mod prompt;
#[cfg(test)]
mod testing;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AuthCommand, AuthorArgs, BrowseCommand, ConfigCommand, ConvertArgs, CreateArgs, UpdateArgs,
};
use context::Context;

/// Confluence CLI - create, update and browse Confluence pages.
#[derive(Parser)]
#[command(name = "confluence", version, about)]
struct Cli {
    /// Path to config TOML (default: ~/.config/confluence-cli/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Config profile name.
    #[arg(long, global = true, default_value = cfl_config::DEFAULT_PROFILE)]
    profile: String,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON where supported.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication and credential storage.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Inspect and diagnose configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Convert Markdown to HTML, no upload.
    Convert(ConvertArgs),
    /// Convert Markdown and create a page, handling same-title pages.
    Create(CreateArgs),
    /// Convert Markdown and update an existing page.
    Update(UpdateArgs),
    /// Draft a page with a self-hosted LLM, edit it, then publish.
    Author(AuthorArgs),
    /// Browse pages: list, children, search, open, tree, view, interactive.
    #[command(subcommand)]
    Browse(BrowseCommand),
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::new(cli.config, cli.profile, cli.quiet, cli.json);

    let result = match cli.command {
        Commands::Auth(cmd) => cmd.execute(&ctx),
        Commands::Config(cmd) => cmd.execute(&ctx),
        Commands::Convert(args) => args.execute(&ctx),
        Commands::Create(args) => args.execute(&ctx),
        Commands::Update(args) => args.execute(&ctx),
        Commands::Author(args) => args.execute(&ctx),
        Commands::Browse(cmd) => cmd.execute(&ctx),
    };

    if let Err(err) = result {
        ctx.output.error(&format!("Error: {err}"));
        std::process::exit(err.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "confluence",
            "browse",
            "children",
            "--page-id",
            "42",
            "--json",
            "--profile",
            "work",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.profile, "work");
        assert!(matches!(cli.command, Commands::Browse(BrowseCommand::Children(_))));
    }

    #[test]
    fn test_author_and_interactive_commands() {
        let cli = Cli::try_parse_from([
            "confluence",
            "author",
            "--title",
            "Runbook",
            "--no-llm",
            "--converter",
            "builtin",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Author(_)));

        let cli =
            Cli::try_parse_from(["confluence", "browse", "interactive", "--space-key", "DOC"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Browse(BrowseCommand::Interactive(_))));
    }

    #[test]
    fn test_search_requires_criteria() {
        assert!(Cli::try_parse_from(["confluence", "browse", "search"]).is_err());
    }
}
