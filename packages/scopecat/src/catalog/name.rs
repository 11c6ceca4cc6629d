//! Scoped name parsing and scope path resolution.
//!
//! A scoped name is either `name` or `name@scope`. The scope half is a
//! filesystem path, or the empty string for the global scope.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Separator between an item name and its scope.
pub const NAME_SCOPE_SEPARATOR: char = '@';

/// The global scope.
pub const GLOBAL_SCOPE: &str = "";

/// Displayed in place of the global scope.
pub const GLOBAL_SCOPE_DISPLAY_NAME: &str = "<global>";

/// Displayed when a lookup did not find any scope.
pub const MISSING_SCOPE_DISPLAY_NAME: &str = "<missing>";

/// Split `name[@scope]` on the first separator.
///
/// The scope is `None` when the caller did not specify one, and `Some("")`
/// when the caller explicitly asked for the global scope with a trailing `@`.
///
/// ```
/// use scopecat::catalog::split_name;
///
/// assert_eq!(split_name("aaa"), ("aaa", None));
/// assert_eq!(split_name("aaa@"), ("aaa", Some("")));
/// assert_eq!(split_name("aaa@/x@y"), ("aaa", Some("/x@y")));
/// ```
pub fn split_name(scoped_name: &str) -> (&str, Option<&str>) {
    match scoped_name.split_once(NAME_SCOPE_SEPARATOR) {
        Some((name, scope)) => (name, Some(scope)),
        None => (scoped_name, None),
    }
}

/// Join a name and optional scope, the inverse of [`split_name`].
pub fn join_name(name: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) => format!("{name}{NAME_SCOPE_SEPARATOR}{scope}"),
        None => name.to_string(),
    }
}

/// Make a scope absolute and fold `.` and `..` components lexically.
///
/// Relative scopes are anchored at `working_dir` when one is known. The
/// global scope passes through untouched. Symlinks are never resolved, so
/// two paths that reach the same folder through different links remain
/// different scopes.
pub fn normalize_scope(scope: &str, working_dir: Option<&Path>) -> String {
    if scope == GLOBAL_SCOPE {
        return String::new();
    }

    let path = Path::new(scope);
    let joined = match working_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized.to_string_lossy().into_owned()
}

/// Find the scope that applies at `working_dir`.
///
/// Walks from `working_dir` up through its ancestors and returns the first
/// folder that has an entry in `payload_map`. Falls back to the global scope
/// when nothing matches or the working folder is unknown.
pub fn active_scope<'m, V>(working_dir: Option<&Path>, payload_map: &'m BTreeMap<String, V>) -> &'m str {
    let Some(working_dir) = working_dir else {
        return GLOBAL_SCOPE;
    };

    working_dir
        .ancestors()
        .find_map(|dir| payload_map.get_key_value(dir.to_string_lossy().as_ref()))
        .map(|(scope, _)| scope.as_str())
        .unwrap_or(GLOBAL_SCOPE)
}
