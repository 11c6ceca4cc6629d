//! CLI subcommands and the options they share.

pub mod alias;
pub mod param;

use std::path::PathBuf;
use std::process;

use clap::Args;
use color_eyre::eyre::{Context, Result};
use scopecat::{
    action::{self, Action, ActionOutcome},
    catalog::ScopedCatalog,
    paths,
};

/// Where catalog files are kept.
#[derive(Args, Clone, Debug)]
pub struct Location {
    /// Folder holding the catalog files. Defaults to the per-user
    /// configuration folder.
    #[arg(long, global = true, env = "SCOPECAT_HOME")]
    pub catalog_dir: Option<PathBuf>,
}

impl Location {
    /// Path of `file` inside the catalog folder.
    pub fn catalog_file(&self, file: &str) -> Result<PathBuf> {
        paths::catalog_dir(self.catalog_dir.as_deref())
            .map(|dir| dir.join(file))
            .context("locate catalog folder")
    }
}

/// Run `action` and exit non-zero if any part of it failed.
///
/// Failures were already reported by the catalog, so there is nothing left
/// to say here.
fn dispatch(catalog: &mut ScopedCatalog, action: &Action) -> Result<()> {
    match action::run(catalog, action).context("run catalog action")? {
        ActionOutcome::Succeeded => Ok(()),
        ActionOutcome::Failed => process::exit(1),
    }
}
