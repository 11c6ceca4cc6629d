//! CLI smoke tests: aliases and parameters set, shown and deleted through
//! the binary.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::{run_scopecat, run_scopecat_with_input};

/// A scratch folder tree: `work/sub` to run from and `catalogs` for files.
struct Scratch {
    _root: TempDir,
    work: PathBuf,
    sub: PathBuf,
    catalogs: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().canonicalize().unwrap();
        let work = base.join("work");
        let sub = work.join("sub");
        let catalogs = base.join("catalogs");
        fs::create_dir_all(&sub).unwrap();
        Self {
            _root: root,
            work,
            sub,
            catalogs,
        }
    }

    fn saved(&self, file: &str) -> Value {
        let content = fs::read_to_string(self.catalogs.join(file)).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

#[test]
fn test_alias_set_show_delete() {
    let scratch = Scratch::new();
    let work = scratch.work.display().to_string();

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll", "ls", "-l"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.stdout, "Set alias: ll\n");

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll@.", "ls", "-la"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(
        scratch.saved("aliases.json"),
        json!({"ll": {"payloads": {"": ["ls", "-l"], work.as_str(): ["ls", "-la"]}}})
    );

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "--all"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    let lines = run.stdout.lines().collect::<Vec<_>>();
    pretty_assert_eq!(lines.len(), 5, "stdout: {}", run.stdout);
    assert!(lines[2].contains("<global>") && lines[2].ends_with("ls -l"));
    assert!(lines[3].contains(&format!("{work} *")) && lines[3].ends_with("ls -la"));
    pretty_assert_eq!(lines[4], r#"("*" marks active scopes)"#);

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "--delete", "--yes", "ll"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.stdout, format!("Deleted alias command: ll@{work}\n"));

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "--delete", "--yes", "ll"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.stdout, "Deleted alias: ll\n");

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.stdout, "No alias commands to show.\n");
}

#[test]
fn test_alias_follows_working_dir() {
    let scratch = Scratch::new();
    run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll", "ls", "-l"]);
    run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll@.", "ls", "-la"]);

    let run = run_scopecat(&scratch.sub, &scratch.catalogs, &["alias", "ll"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    let rows = run.stdout.lines().skip(2).collect::<Vec<_>>();
    pretty_assert_eq!(rows.len(), 1, "stdout: {}", run.stdout);
    assert!(rows[0].ends_with("ls -la"), "stdout: {}", run.stdout);

    let run = run_scopecat(&scratch.catalogs, &scratch.catalogs, &["alias", "ll"]);
    let rows = run.stdout.lines().skip(2).collect::<Vec<_>>();
    pretty_assert_eq!(rows.len(), 1, "stdout: {}", run.stdout);
    assert!(rows[0].ends_with("ls -l"), "stdout: {}", run.stdout);
}

#[test]
fn test_alias_display_is_shell_quoted() {
    let scratch = Scratch::new();
    let run = run_scopecat(
        &scratch.work,
        &scratch.catalogs,
        &["alias", "--comment", "say hi", "greet", "echo", "hello world"],
    );
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(
        run.stdout,
        "Set alias: greet\nSet alias comment succeeded: greet\n"
    );

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "greet"]);
    let row = run.stdout.lines().nth(2).unwrap_or_default();
    assert!(row.contains("say hi"), "stdout: {}", run.stdout);
    assert!(row.ends_with("echo 'hello world'"), "stdout: {}", run.stdout);
}

#[test]
fn test_alias_delete_prompts() {
    let scratch = Scratch::new();
    run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll", "ls"]);

    let run = run_scopecat_with_input(
        &scratch.work,
        &scratch.catalogs,
        &["alias", "--delete", "ll"],
        "n\n",
    );
    pretty_assert_eq!(run.exit_code, 1);
    assert!(run.stdout.contains(r#"Delete alias "ll"?"#), "stdout: {}", run.stdout);
    assert!(
        run.stderr.contains("Delete action abandoned: ll"),
        "stderr: {}",
        run.stderr
    );

    let run = run_scopecat_with_input(
        &scratch.work,
        &scratch.catalogs,
        &["alias", "--delete", "ll"],
        "y\n",
    );
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(scratch.saved("aliases.json"), json!({}));
}

#[test]
fn test_alias_rejects_bad_combinations() {
    let scratch = Scratch::new();

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "--delete"]);
    assert_ne!(run.exit_code, 0);
    assert!(
        run.stderr.contains("Catalog action requires a name."),
        "stderr: {}",
        run.stderr
    );

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "--all", "ll", "ls"]);
    assert_ne!(run.exit_code, 0);
    assert!(
        run.stderr.contains("All option only applies to catalog show action."),
        "stderr: {}",
        run.stderr
    );

    let run = run_scopecat(&scratch.work, &scratch.catalogs, &["alias", "ll@/somewhere", "ls"]);
    pretty_assert_eq!(run.exit_code, 1);
    assert!(
        run.stderr.contains("Must set global alias command as default"),
        "stderr: {}",
        run.stderr
    );
    assert!(!scratch.catalogs.join("aliases.json").exists());
}

#[test]
fn test_param_locked_to_defaults() {
    let scratch = Scratch::new();
    let defaults = scratch.work.join("defaults.json");
    fs::write(
        &defaults,
        json!({
            "jobs": {"value": 4, "comment": "parallel jobs"},
            "paths": ["/usr/lib"],
            "color": true,
        })
        .to_string(),
    )
    .unwrap();
    let defaults = defaults.display().to_string();
    let param = |args: &[&str]| {
        let mut full = vec!["param", "--defaults", defaults.as_str()];
        full.extend_from_slice(args);
        run_scopecat(&scratch.work, &scratch.catalogs, &full)
    };

    let run = param(&["jobs", "8"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.stdout, "Set parameter: jobs\n");

    let run = param(&["paths", "/opt/lib", "/usr/local/lib"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);

    let run = param(&["color@.", "false"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);

    let saved = scratch.saved("params.json");
    pretty_assert_eq!(saved["jobs"]["payloads"][""], json!(8));
    pretty_assert_eq!(saved["jobs"]["comment"], json!("parallel jobs"));
    pretty_assert_eq!(
        saved["paths"]["payloads"][""],
        json!(["/opt/lib", "/usr/local/lib"])
    );
    pretty_assert_eq!(
        saved["color"]["payloads"][scratch.work.display().to_string().as_str()],
        json!(false)
    );

    let run = param(&["missing", "1"]);
    pretty_assert_eq!(run.exit_code, 1);
    assert!(
        run.stderr.contains("Not allowed to create new parameter: missing"),
        "stderr: {}",
        run.stderr
    );

    let run = param(&["jobs", "1", "2"]);
    assert_ne!(run.exit_code, 0);
    assert!(
        run.stderr.contains("Parameter only accepts a simple value: jobs"),
        "stderr: {}",
        run.stderr
    );

    let run = param(&["--delete", "--yes", "jobs"]);
    pretty_assert_eq!(run.exit_code, 1);
    assert!(
        run.stderr.contains("Not allowed to delete parameter: jobs"),
        "stderr: {}",
        run.stderr
    );

    let run = param(&["--delete", "--yes", "color"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(
        run.stdout,
        format!("Deleted parameter value: color@{}\n", scratch.work.display())
    );

    let run = param(&["jobs"]);
    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    let row = run.stdout.lines().nth(2).unwrap_or_default();
    assert!(row.contains("parallel jobs") && row.ends_with('8'), "stdout: {}", run.stdout);
}
