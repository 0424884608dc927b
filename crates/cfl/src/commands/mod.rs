//! CLI command implementations.

pub(crate) mod auth;
pub(crate) mod author;
pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod convert;
pub(crate) mod create;
pub(crate) mod update;

pub(crate) use auth::AuthCommand;
pub(crate) use author::AuthorArgs;
pub(crate) use browse::BrowseCommand;
pub(crate) use config::ConfigCommand;
pub(crate) use convert::ConvertArgs;
pub(crate) use create::CreateArgs;
pub(crate) use update::UpdateArgs;
