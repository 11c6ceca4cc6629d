//! Manage command aliases.

use clap::Args;
use color_eyre::eyre::Result;
use scopecat::{
    action::Action,
    catalog::{CatalogConfig, Labels, PayloadFormat, ScopedCatalog},
    console::Terminal,
    paths,
};
use serde_json::Value;

use super::Location;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Alias name with an optional `@scope`: `@` alone is the global scope,
    /// `@.` the current folder.
    pub name: Option<String>,

    /// Command to alias, followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Set the alias comment.
    #[arg(long)]
    pub comment: Option<String>,

    /// Delete the alias, or just its active scope.
    #[arg(long)]
    pub delete: bool,

    /// Show every scope instead of only the active ones.
    #[arg(long)]
    pub all: bool,

    /// Delete without asking for confirmation.
    #[arg(long, short)]
    pub yes: bool,
}

/// Set, delete or show aliases depending on which options are present.
pub fn main(location: Location, config: Config) -> Result<()> {
    let path = location.catalog_file(paths::ALIASES_FILE)?;
    let catalog_config = CatalogConfig::builder()
        .path(path)
        .labels(Labels::alias())
        .payload_format(PayloadFormat::ShellCommand)
        .build();
    let mut catalog = ScopedCatalog::open(catalog_config, Terminal);

    let payload = (!config.command.is_empty()).then(|| Value::from(config.command));
    let show = payload.is_none() && config.comment.is_none() && !config.delete;
    let action = Action::builder()
        .maybe_name(config.name)
        .maybe_payload(payload)
        .maybe_comment(config.comment)
        .delete(config.delete)
        .show(show)
        .all(config.all)
        .confirm(!config.yes)
        .build();

    super::dispatch(&mut catalog, &action)
}
