//! Manage tool parameters.
//!
//! The parameter catalog is locked: only parameters named in the defaults
//! file exist, and values are parsed to match the type of their default.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Context, Result, bail};
use scopecat::{
    action::Action,
    catalog::{CatalogConfig, Defaults, Labels, ScopedCatalog, split_name},
    console::Terminal,
    paths,
};
use serde_json::{Number, Value};

use super::Location;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Parameter name with an optional `@scope`.
    pub name: Option<String>,

    /// New value. Several values are accepted only when the parameter
    /// defaults to a list.
    #[arg(allow_hyphen_values = true)]
    pub value: Vec<String>,

    /// JSON file with parameter defaults, mapping names to values or to
    /// `{"value": ..., "comment": ...}`. Defaults to `param-defaults.json`
    /// in the catalog folder.
    #[arg(long, env = "SCOPECAT_PARAM_DEFAULTS")]
    pub defaults: Option<PathBuf>,

    /// Delete the active scoped value of the parameter.
    #[arg(long)]
    pub delete: bool,

    /// Show every scope instead of only the active ones.
    #[arg(long)]
    pub all: bool,

    /// Delete without asking for confirmation.
    #[arg(long, short)]
    pub yes: bool,
}

/// Set, delete or show parameters depending on which options are present.
pub fn main(location: Location, config: Config) -> Result<()> {
    let path = location.catalog_file(paths::PARAMS_FILE)?;
    let defaults_path = match config.defaults {
        Some(path) => path,
        None => location.catalog_file(paths::PARAM_DEFAULTS_FILE)?,
    };
    let defaults = Defaults::read(&defaults_path)?;

    let catalog_config = CatalogConfig::builder()
        .path(path)
        .locked(true)
        .labels(Labels::parameter())
        .defaults(defaults.payloads)
        .comments(defaults.comments)
        .build();
    let mut catalog = ScopedCatalog::open(catalog_config, Terminal);

    let payload = match config.name.as_deref() {
        Some(name) if !config.value.is_empty() => {
            let (name, _) = split_name(name);
            Some(parse_value(name, catalog.defaults().get(name), &config.value)?)
        }
        _ => None,
    };
    let show = payload.is_none() && !config.delete;
    let action = Action::builder()
        .maybe_name(config.name)
        .maybe_payload(payload)
        .delete(config.delete)
        .show(show)
        .all(config.all)
        .confirm(!config.yes)
        .build();

    super::dispatch(&mut catalog, &action)
}

/// Build a payload from command line words, shaped like the default.
fn parse_value(name: &str, default: Option<&Value>, words: &[String]) -> Result<Value> {
    match default {
        Some(Value::Array(items)) => words
            .iter()
            .map(|word| parse_word(items.first(), word))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        default => match words {
            [word] => parse_word(default, word),
            _ => bail!("Parameter only accepts a simple value: {name}"),
        },
    }
}

fn parse_word(like: Option<&Value>, word: &str) -> Result<Value> {
    match like {
        Some(Value::Bool(_)) => word
            .parse::<bool>()
            .map(Value::Bool)
            .with_context(|| format!("expected true or false: {word:?}")),
        Some(Value::Number(_)) => word
            .parse::<Number>()
            .map(Value::Number)
            .with_context(|| format!("expected a number: {word:?}")),
        _ => Ok(Value::String(word.to_string())),
    }
}
