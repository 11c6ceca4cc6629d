//! Where catalog files live.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{OptionExt, Result};
use directories::ProjectDirs;

/// Catalog of command aliases.
pub const ALIASES_FILE: &str = "aliases.json";

/// Catalog of tool parameters.
pub const PARAMS_FILE: &str = "params.json";

/// Parameter defaults, read when no other defaults file is given.
pub const PARAM_DEFAULTS_FILE: &str = "param-defaults.json";

/// Get the project directories for the application.
#[tracing::instrument]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "scopecat", "scopecat")
}

/// The folder catalogs are kept in: `dir` when given, otherwise the per-user
/// configuration folder.
#[tracing::instrument]
pub fn catalog_dir(dir: Option<&Path>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_eyre("no home directory to keep catalogs in"),
    }
}
