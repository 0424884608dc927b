//! `confluence auth` commands.

use cfl_config::Profile;
use clap::{Args, Subcommand};

use crate::context::Context;
use crate::error::CliError;
use crate::prompt::{Prompt, TermPrompt};

/// Authentication commands.
#[derive(Subcommand)]
pub(crate) enum AuthCommand {
    /// Store base URL, token, default space key and LLM settings in the selected profile.
    Login(LoginArgs),
}

impl AuthCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Login(args) => args.run(ctx, &mut TermPrompt::new()),
        }
    }
}

/// Arguments for `auth login`.
#[derive(Args, Default)]
pub(crate) struct LoginArgs {
    /// Confluence base URL (e.g. <https://your-domain.atlassian.net/wiki>).
    #[arg(long)]
    base_url: Option<String>,

    /// Personal access token / API token.
    #[arg(long)]
    pat: Option<String>,

    /// Default space key used when `--space-key` is omitted.
    #[arg(long)]
    default_space_key: Option<String>,

    /// Self-hosted LLM provider for `confluence author`.
    #[arg(long, value_parser = ["ollama", "openai_compat"])]
    llm_provider: Option<String>,

    /// Model name (e.g. `mistral:latest` for Ollama).
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL.
    #[arg(long)]
    ollama_base: Option<String>,

    /// OpenAI-compatible API base (e.g. <http://localhost:8000/v1>).
    #[arg(long)]
    api_base: Option<String>,

    /// API key for the OpenAI-compatible provider.
    #[arg(long)]
    api_key: Option<String>,

    /// Prompt for LLM settings even when no LLM flag is given.
    #[arg(long)]
    configure_llm: bool,
}

/// One profile key collected by `auth login`.
struct Field<'a> {
    key: &'static str,
    label: &'a str,
    flag: Option<&'a str>,
    stored: Option<&'a str>,
    fallback: Option<&'a str>,
    secret: bool,
}

impl Field<'_> {
    /// Value to write; `None` leaves the stored value untouched.
    ///
    /// A flag wins. Otherwise the user is asked; pressing Enter keeps an
    /// existing stored value, or takes the fallback when nothing is stored.
    fn collect(&self, prompt: &mut dyn Prompt) -> Result<Option<String>, CliError> {
        if let Some(flag) = self.flag.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(Some(flag.to_owned()));
        }
        let stored = self.stored.filter(|v| !v.is_empty());
        let answer = prompt.ask(self.label, stored.or(self.fallback), self.secret)?;
        if !answer.is_empty() {
            return Ok(Some(answer));
        }
        Ok(match stored {
            Some(_) => None,
            None => self.fallback.map(str::to_owned),
        })
    }
}

impl LoginArgs {
    /// Collect values (flags first, then prompts) and save them to the profile.
    ///
    /// Prompt defaults come from the profile as written, so `${VAR}`
    /// references and values inherited from `[default]` are never copied
    /// into the file. Only keys with a new value are written.
    pub(crate) fn run(self, ctx: &Context, prompt: &mut dyn Prompt) -> Result<(), CliError> {
        let stored = ctx.store().load_stored(ctx.profile_name())?;
        let updates = self.updates(&stored, prompt)?;

        if updates.is_empty() {
            ctx.output.info("Nothing to change.");
            return Ok(());
        }
        let pairs: Vec<(&str, &str)> = updates.iter().map(|(k, v)| (*k, v.as_str())).collect();
        ctx.store().save(ctx.profile_name(), &pairs, false)?;

        ctx.output.info(&format!(
            "Saved profile [{}] to {}",
            ctx.profile_name(),
            ctx.store().path().display()
        ));
        for (key, value) in &pairs {
            let shown = if key.ends_with("pat") || key.ends_with("api_key") {
                "***"
            } else {
                *value
            };
            ctx.output.info(&format!("  {key} = {shown}"));
        }
        ctx.output.success("Done.");
        Ok(())
    }

    fn updates(
        &self,
        stored: &Profile,
        prompt: &mut dyn Prompt,
    ) -> Result<Vec<(&'static str, String)>, CliError> {
        let mut updates = Vec::new();

        collect_into(
            &mut updates,
            &Field {
                key: "base_url",
                label: "Confluence base URL",
                flag: self.base_url.as_deref(),
                stored: stored.base_url.as_deref(),
                fallback: None,
                secret: false,
            },
            prompt,
        )?;
        collect_into(
            &mut updates,
            &Field {
                key: "pat",
                label: "API token (PAT)",
                flag: self.pat.as_deref(),
                stored: stored.pat.as_deref(),
                fallback: None,
                secret: true,
            },
            prompt,
        )?;
        collect_into(
            &mut updates,
            &Field {
                key: "default_space_key",
                label: "Default space key",
                flag: self.default_space_key.as_deref(),
                stored: stored.default_space_key.as_deref(),
                fallback: None,
                secret: false,
            },
            prompt,
        )?;

        if !self.wants_llm() {
            return Ok(updates);
        }

        // Write where the profile already keeps its LLM settings.
        let nested = stored.llm.is_some();
        let key = |flat: &'static str, dotted: &'static str| if nested { dotted } else { flat };
        let current = stored.llm_settings();

        let chosen = collect_into(
            &mut updates,
            &Field {
                key: key("llm_provider", "llm.provider"),
                label: "LLM provider (ollama/openai_compat)",
                flag: self.llm_provider.as_deref(),
                stored: current.provider.as_deref(),
                fallback: Some("ollama"),
                secret: false,
            },
            prompt,
        )?;
        let provider = chosen
            .map(|p| p.to_lowercase())
            .or_else(|| current.provider_name())
            .unwrap_or_else(|| "ollama".to_owned());

        match provider.as_str() {
            "ollama" => {
                collect_into(
                    &mut updates,
                    &Field {
                        key: key("model", "llm.model"),
                        label: "Ollama model",
                        flag: self.model.as_deref(),
                        stored: current.model.as_deref(),
                        fallback: Some("mistral:latest"),
                        secret: false,
                    },
                    prompt,
                )?;
                collect_into(
                    &mut updates,
                    &Field {
                        key: key("ollama_base", "llm.ollama_base"),
                        label: "Ollama base URL",
                        flag: self.ollama_base.as_deref(),
                        stored: current.ollama_base.as_deref(),
                        fallback: Some("http://localhost:11434"),
                        secret: false,
                    },
                    prompt,
                )?;
            }
            "openai_compat" => {
                collect_into(
                    &mut updates,
                    &Field {
                        key: key("api_base", "llm.api_base"),
                        label: "OpenAI-compatible API base",
                        flag: self.api_base.as_deref(),
                        stored: current.api_base.as_deref(),
                        fallback: Some("http://localhost:8000/v1"),
                        secret: false,
                    },
                    prompt,
                )?;
                collect_into(
                    &mut updates,
                    &Field {
                        key: key("api_key", "llm.api_key"),
                        label: "API key",
                        flag: self.api_key.as_deref(),
                        stored: current.api_key.as_deref(),
                        fallback: None,
                        secret: true,
                    },
                    prompt,
                )?;
                collect_into(
                    &mut updates,
                    &Field {
                        key: key("model", "llm.model"),
                        label: "Model name",
                        flag: self.model.as_deref(),
                        stored: current.model.as_deref(),
                        fallback: Some("mistral-7b-instruct"),
                        secret: false,
                    },
                    prompt,
                )?;
            }
            other => {
                return Err(CliError::Validation(format!(
                    "unknown LLM provider '{other}'; use ollama or openai_compat"
                )));
            }
        }
        Ok(updates)
    }

    fn wants_llm(&self) -> bool {
        self.configure_llm
            || [
                &self.llm_provider,
                &self.model,
                &self.ollama_base,
                &self.api_base,
                &self.api_key,
            ]
            .iter()
            .any(|v| v.is_some())
    }
}

/// Collect one field, recording it in `updates` when it has a value to write.
fn collect_into(
    updates: &mut Vec<(&'static str, String)>,
    field: &Field<'_>,
    prompt: &mut dyn Prompt,
) -> Result<Option<String>, CliError> {
    let value = field.collect(prompt)?;
    if let Some(value) = &value {
        updates.push((field.key, value.clone()));
    }
    Ok(value)
}
