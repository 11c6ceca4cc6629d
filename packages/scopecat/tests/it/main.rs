//! Integration tests for scoped catalogs.
//!
//! - `catalog` drives the library against real catalog files
//! - `cli` runs the `scopecat` binary from inside scratch folder trees

mod catalog;
mod cli;

use std::path::Path;

use xshell::{Shell, cmd};

/// Output of one `scopecat` run.
#[derive(Debug)]
pub struct Run {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `scopecat` from `cwd` with catalogs kept in `catalog_dir`.
pub fn run_scopecat(cwd: &Path, catalog_dir: &Path, args: &[&str]) -> Run {
    run_scopecat_with_input(cwd, catalog_dir, args, "")
}

/// Like [`run_scopecat`], answering prompts with `input`.
pub fn run_scopecat_with_input(cwd: &Path, catalog_dir: &Path, args: &[&str], input: &str) -> Run {
    let sh = Shell::new().expect("create shell");
    sh.change_dir(cwd);

    let bin = env!("CARGO_BIN_EXE_scopecat");
    let output = cmd!(sh, "{bin} --catalog-dir {catalog_dir} {args...}")
        .env_remove("SCOPECAT_HOME")
        .env_remove("SCOPECAT_LOG")
        .env_remove("SCOPECAT_PARAM_DEFAULTS")
        .stdin(input)
        .ignore_status()
        .quiet()
        .output()
        .expect("run scopecat");

    Run {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
