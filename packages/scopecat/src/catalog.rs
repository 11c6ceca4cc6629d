//! Persistent scoped data catalog.
//!
//! A catalog maps item names to a global payload plus optional per-folder
//! overrides. Lookups without an explicit `@scope` walk up from the working
//! directory to the closest folder holding an override, falling back to the
//! global payload.
//!
//! Payloads are opaque JSON values; callers decide what they mean.
//!
//! ```
//! use scopecat::catalog::{CatalogConfig, ScopedCatalog};
//! use scopecat::console::Recorder;
//!
//! let console = Recorder::default();
//! let config = CatalogConfig::builder().working_dir("/work/project").build();
//! let mut catalog = ScopedCatalog::open(config, &console);
//!
//! catalog.set("editor", "vi", false);
//! catalog.set("editor@/work", "emacs", false);
//!
//! let found = catalog.get("editor");
//! assert_eq!(found.found_scope.as_deref(), Some("/work"));
//! assert_eq!(found.found_payload, Some("emacs".into()));
//! ```

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use itertools::Itertools;
use serde_json::Value;
use tap::TapFallible;

pub use config::{CatalogConfig, Defaults, Labels, PayloadFormat};
pub use item::ScopedItem;
pub use name::{
    GLOBAL_SCOPE, GLOBAL_SCOPE_DISPLAY_NAME, MISSING_SCOPE_DISPLAY_NAME, NAME_SCOPE_SEPARATOR,
    active_scope, join_name, normalize_scope, split_name,
};
pub use outcome::{CatalogError, ErrorCategory, Outcome};
pub use query::{Query, Row, StringRow};
pub use store::{LoadError, SaveError};

mod config;
mod item;
mod name;
mod outcome;
mod query;
pub mod store;

use crate::console::{Console, Terminal};
use crate::table;

/// Shown under tables that mark active scopes.
pub const ACTIVE_SCOPE_LEGEND: &str = r#"("*" marks active scopes)"#;

/// Appended to the displayed scope of active rows.
pub const ACTIVE_SCOPE_MARKER: &str = " *";

/// Manages and provides access to a scoped data catalog.
///
/// Changes stay in memory until [`ScopedCatalog::save`] is called, either
/// directly or at the end of a successful [`ScopedCatalog::session`].
#[derive(Debug)]
pub struct ScopedCatalog<C = Terminal> {
    config: CatalogConfig,
    console: C,
    items: BTreeMap<String, ScopedItem>,
    modified: bool,
    saving_disabled: bool,
}

impl<C: Console> ScopedCatalog<C> {
    /// Seed the catalog from the configured defaults, then load the backing
    /// file if there is one.
    ///
    /// Loading problems never fail construction: they are reported through
    /// the console and saving is disabled so the file is not overwritten
    /// with partial data.
    #[tracing::instrument(skip_all, fields(path = ?config.path, locked = config.locked))]
    pub fn open(config: CatalogConfig, console: C) -> Self {
        let items = config
            .defaults
            .iter()
            .map(|(name, payload)| {
                let item = ScopedItem::builder()
                    .name(name)
                    .global_payload(payload.clone())
                    .maybe_comment(config.comments.get(name))
                    .build();
                (name.clone(), item)
            })
            .collect();

        let mut catalog = Self {
            config,
            console,
            items,
            modified: false,
            saving_disabled: false,
        };
        catalog.load();
        catalog
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Default payloads the catalog was seeded with.
    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.config.defaults
    }

    pub fn is_locked(&self) -> bool {
        self.config.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.config.locked = locked;
    }

    /// Change the folder that scope resolution starts from.
    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config.working_dir = Some(dir.into());
    }

    /// Whether there are changes that have not been saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether saving was disabled by errors during the last load.
    pub fn is_saving_disabled(&self) -> bool {
        self.saving_disabled
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, name: &str) -> Option<&ScopedItem> {
        self.items.get(name)
    }

    /// Whether the item exists and, for a non-global `@scope`, whether it
    /// has a payload at that scope.
    pub fn exists(&self, scoped_name: &str) -> bool {
        let (name, scope) = split_name(scoped_name);
        let Some(item) = self.items.get(name) else {
            return false;
        };
        match scope {
            None | Some(GLOBAL_SCOPE) => true,
            Some(scope) => {
                let scope = normalize_scope(scope, self.working_dir().as_deref());
                item.payload_map.contains_key(&scope)
            }
        }
    }

    /// Look up a payload by `name[@scope]`.
    ///
    /// With an explicit scope only that exact scope is considered. Without
    /// one the active scope for the working directory is used.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, scoped_name: &str) -> Outcome {
        let outcome = self.lookup(scoped_name);
        tracing::debug!(found = outcome.found_scope_display(), "looked up");
        outcome
    }

    /// Create or update a payload.
    ///
    /// - Without `@scope` on a missing item: create it with a global payload.
    /// - Without `@scope` on an existing item: update the active scope.
    /// - With `@scope`: set that scope; the item must already exist.
    #[tracing::instrument(skip(self, payload))]
    pub fn set(&mut self, scoped_name: &str, payload: impl Into<Value>, verbose: bool) -> Outcome {
        let payload = payload.into();
        let mut outcome = self.lookup(scoped_name);
        let labels = &self.config.labels;

        if self.config.locked && !outcome.item_exists {
            let error = CatalogError::CreateNotAllowed {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if outcome.scope.is_some() && !outcome.item_exists {
            let error = CatalogError::GlobalRequired {
                label: labels.payload.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }

        let working_dir = self.working_dir();
        let scope = match self.items.get_mut(&outcome.name) {
            Some(item) => {
                let scope = match &outcome.scope {
                    Some(scope) => scope.clone(),
                    None => active_scope(working_dir.as_deref(), &item.payload_map).to_string(),
                };
                item.set_payload(&scope, payload.clone());
                scope
            }
            None => {
                let item = ScopedItem::builder()
                    .name(&outcome.name)
                    .global_payload(payload.clone())
                    .build();
                self.items.insert(outcome.name.clone(), item);
                GLOBAL_SCOPE.to_string()
            }
        };

        tracing::debug!(name = %outcome.name, %scope, "set payload");
        outcome.found_scope = Some(scope);
        outcome.found_payload = Some(payload);
        self.modified = true;
        self.announce(verbose, || format!("Set {}: {}", self.config.labels.item, outcome.name));
        outcome
    }

    /// Delete an item or one of its scoped payloads.
    ///
    /// Without `@scope` the active scope is the target: the whole item when
    /// that is the global scope, otherwise just the active scoped payload.
    /// With `@scope` only that scoped payload is removed, and the global
    /// scope (`name@`) can never be deleted this way.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, scoped_name: &str, verbose: bool, confirm: bool) -> Outcome {
        let outcome = self.lookup(scoped_name);
        let labels = &self.config.labels;

        if self.config.locked && outcome.found_scope.as_deref() == Some(GLOBAL_SCOPE) {
            let error = CatalogError::DeleteNotAllowed {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if !outcome.item_exists {
            let error = CatalogError::MissingItem {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if outcome.scope.as_deref() == Some(GLOBAL_SCOPE) {
            let error = CatalogError::GlobalDeleteNotAllowed {
                label: labels.payload.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        let Some(found_scope) = outcome.found_scope.clone() else {
            let error = CatalogError::MissingScopedPayload {
                label: labels.payload.clone(),
                scoped_name: join_name(&outcome.name, outcome.scope.as_deref()),
            };
            return self.reject(outcome, error, verbose);
        };

        let whole_item = found_scope == GLOBAL_SCOPE;
        let (label, target) = if whole_item {
            (&labels.item, outcome.name.clone())
        } else {
            (&labels.payload, join_name(&outcome.name, Some(&found_scope)))
        };
        let label = label.clone();

        if confirm && !self.console.confirm(&format!("Delete {label} \"{target}\"")) {
            let error = CatalogError::Abandoned {
                scoped_name: join_name(&outcome.name, outcome.scope.as_deref()),
            };
            return self.reject(outcome, error, verbose);
        }

        if whole_item {
            self.items.remove(&outcome.name);
        } else if let Some(item) = self.items.get_mut(&outcome.name) {
            item.payload_map.remove(&found_scope);
        }

        tracing::debug!(%target, whole_item, "deleted");
        self.modified = true;
        self.announce(verbose, || format!("Deleted {label}: {target}"));
        outcome
    }

    /// Rename a whole item, carrying all of its payloads and its comment.
    #[tracing::instrument(skip(self))]
    pub fn rename(&mut self, name1: &str, name2: &str, verbose: bool) -> Outcome {
        let mut outcome = self.lookup(name1);
        outcome.found_scope = None;
        outcome.found_payload = None;
        let (target, target_scope) = split_name(name2);
        let labels = &self.config.labels;

        if self.config.locked {
            let error = CatalogError::RenameNotAllowed {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if outcome.scope.is_some() || target_scope.is_some() {
            let error = CatalogError::RenameScoped {
                label: labels.item.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if !outcome.item_exists {
            let error = CatalogError::RenameSourceMissing {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if self.items.contains_key(target) {
            let error = CatalogError::RenameTargetExists {
                label: labels.item.clone(),
                name: target.to_string(),
            };
            return self.reject(outcome, error, verbose);
        }

        if let Some(mut item) = self.items.remove(&outcome.name) {
            item.name = target.to_string();
            self.items.insert(target.to_string(), item);
        }
        self.modified = true;
        self.announce(verbose, || {
            format!(
                "Renamed {}: \"{}\" -> \"{target}\"",
                self.config.labels.item, outcome.name
            )
        });
        outcome
    }

    /// Replace an item's comment.
    #[tracing::instrument(skip(self))]
    pub fn comment(&mut self, name: &str, comment: &str, verbose: bool) -> Outcome {
        let mut outcome = self.lookup(name);
        outcome.found_scope = None;
        outcome.found_payload = None;
        let labels = &self.config.labels;

        if self.config.locked {
            let error = CatalogError::CommentNotAllowed {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }
        if outcome.scope.is_some() {
            let error = CatalogError::CommentScoped {
                label: labels.item.clone(),
                scoped_name: join_name(&outcome.name, outcome.scope.as_deref()),
            };
            return self.reject(outcome, error, verbose);
        }
        if !outcome.item_exists {
            let error = CatalogError::CommentTargetMissing {
                label: labels.item.clone(),
                name: outcome.name.clone(),
            };
            return self.reject(outcome, error, verbose);
        }

        if let Some(item) = self.items.get_mut(&outcome.name) {
            item.comment = Some(comment.to_string());
        }
        self.modified = true;
        self.announce(verbose, || {
            format!("Set {} comment succeeded: {}", self.config.labels.item, outcome.name)
        });
        outcome
    }

    /// Rows matching `query`: items by name, and within an item the global
    /// row first followed by scoped rows in sorted order.
    pub fn query<'a>(&'a self, query: &Query) -> impl Iterator<Item = Row<'a>> + use<'a, C> {
        let working_dir = self.working_dir();
        let (name, name_scope) = match query.name.as_deref() {
            Some(scoped_name) => {
                let (name, scope) = split_name(scoped_name);
                (Some(name), scope)
            }
            None => (None, None),
        };
        let scope_filter = query
            .scope
            .as_deref()
            .or(name_scope)
            .map(|scope| normalize_scope(scope, working_dir.as_deref()));
        let comment_filter = query.comment.clone();
        let payload_filter = query.payload.clone();
        let active_filter = query.active;

        let items = match name {
            Some(name) => self.items.get(name).into_iter().collect_vec(),
            None => self.items.values().collect_vec(),
        };

        items
            .into_iter()
            .filter(move |item| {
                comment_filter
                    .as_deref()
                    .is_none_or(|comment| item.comment.as_deref() == Some(comment))
            })
            .flat_map(move |item| {
                let active = active_scope(working_dir.as_deref(), &item.payload_map);
                item.payloads().map(move |(scope, payload)| Row {
                    name: &item.name,
                    scope,
                    comment: item.comment.as_deref(),
                    payload,
                    active: scope == active,
                })
            })
            .filter(move |row| {
                scope_filter.as_deref().is_none_or(|scope| scope == row.scope)
                    && payload_filter.as_ref().is_none_or(|payload| payload == row.payload)
                    && active_filter.is_none_or(|active| active == row.active)
            })
    }

    /// Rows matching `query`, rendered for display.
    ///
    /// The global scope shows as `<global>`. Unless the query filters on
    /// active state, active rows get a trailing `*` marker.
    pub fn query_strings<'a>(&'a self, query: &Query) -> impl Iterator<Item = StringRow> + use<'a, C> {
        let format = self.config.payload_format;
        let mark_active = query.active.is_none();
        self.query(query).map(move |row| {
            let mut scope = match row.scope {
                GLOBAL_SCOPE => GLOBAL_SCOPE_DISPLAY_NAME.to_string(),
                scope => scope.to_string(),
            };
            if mark_active && row.active {
                scope.push_str(ACTIVE_SCOPE_MARKER);
            }
            StringRow {
                name: row.name.to_string(),
                scope,
                comment: row.comment.unwrap_or_default().to_string(),
                payload: format.format(row.payload),
            }
        })
    }

    /// Rows matching `query` as table lines.
    pub fn format_table(&self, query: &Query) -> Vec<String> {
        let rows = self
            .query_strings(query)
            .map(StringRow::into_cells)
            .collect_vec();
        table::format_table(&self.headers(), &rows)
    }

    /// Print rows matching `query` through the console.
    pub fn show(&self, query: &Query) {
        let rows = self.query_strings(query).collect_vec();
        let labels = &self.config.labels;

        if rows.is_empty() {
            match &query.name {
                Some(name) => self
                    .console
                    .message(&format!("{} not found: {name}", capitalize(&labels.item))),
                None => self
                    .console
                    .message(&format!("No {} to show.", labels.payload_plural)),
            }
            return;
        }

        let marked = query.active.is_none()
            && rows.iter().any(|row| row.scope.ends_with(ACTIVE_SCOPE_MARKER));
        let rows = rows.into_iter().map(StringRow::into_cells).collect_vec();
        for line in table::format_table(&self.headers(), &rows) {
            self.console.message(&line);
        }
        if marked {
            self.console.message(ACTIVE_SCOPE_LEGEND);
        }
    }

    /// Load items from the backing file over whatever is in memory.
    ///
    /// Re-enables saving first, so a clean load recovers from an earlier
    /// failed one.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self) {
        let Some(path) = self.config.path.clone() else {
            return;
        };

        self.saving_disabled = false;
        let loaded = store::read(&path, &self.config.labels);
        tracing::debug!(?path, items = loaded.items.len(), "loaded catalog");
        for item in loaded.items {
            self.items.insert(item.name.clone(), item);
        }

        if !loaded.errors.is_empty() {
            tracing::warn!(?path, errors = ?loaded.errors, "load catalog");
            self.console
                .error(&format!("Failed to load: {}", path.display()));
            for error in &loaded.errors {
                self.console.error(&error.to_string());
            }
            self.saving_disabled = true;
        }
        self.modified = false;
    }

    /// Write the catalog to its backing file.
    ///
    /// Returns whether the file was written, which is never the case for a
    /// catalog without a path. Failures are reported through the console and
    /// leave the in-memory catalog usable.
    #[tracing::instrument(skip(self))]
    pub fn save(&mut self) -> bool {
        let Some(path) = self.config.path.clone() else {
            return false;
        };

        if self.saving_disabled {
            self.console.error("Saving was disabled due to errors.");
            self.console
                .error("Please correct previous errors or delete the file.");
            self.console.error(&path.display().to_string());
            return false;
        }

        match store::write(&path, self.items.values()) {
            Ok(()) => {
                self.modified = false;
                true
            }
            Err(error) => {
                tracing::warn!(?path, %error, "save catalog");
                self.console
                    .error(&format!("Failed to save: {}", path.display()));
                self.console.error(&error.to_string());
                false
            }
        }
    }

    /// Run `body` against the catalog, saving afterwards if it succeeded and
    /// changed anything.
    pub fn session<T, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let result = body(self);
        if result.is_ok() && self.modified {
            self.save();
        }
        result
    }

    fn headers(&self) -> [&str; 4] {
        ["name", "scope", "comment", &self.config.labels.payload]
    }

    /// The folder scope resolution starts from, normalized like scopes so
    /// that the two compare equal.
    fn working_dir(&self) -> Option<PathBuf> {
        let dir = match &self.config.working_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir()
                .tap_err(|error| tracing::warn!(?error, "query working directory"))
                .ok()?,
        };
        Some(PathBuf::from(normalize_scope(&dir.to_string_lossy(), None)))
    }

    fn lookup(&self, scoped_name: &str) -> Outcome {
        let working_dir = self.working_dir();
        let (name, scope) = split_name(scoped_name);
        let scope = scope.map(|scope| normalize_scope(scope, working_dir.as_deref()));

        let item = self.items.get(name);
        let found_scope = item.and_then(|item| match &scope {
            Some(scope) => item.payload(scope).map(|_| scope.clone()),
            None => Some(active_scope(working_dir.as_deref(), &item.payload_map).to_string()),
        });
        let found_payload = item
            .zip(found_scope.as_deref())
            .and_then(|(item, scope)| item.payload(scope))
            .cloned();

        Outcome {
            name: name.to_string(),
            scope,
            item_exists: item.is_some(),
            found_scope,
            found_payload,
            errors: Vec::new(),
        }
    }

    fn reject(&self, outcome: Outcome, error: CatalogError, verbose: bool) -> Outcome {
        tracing::debug!(%error, category = %error.category(), "rejected");
        if verbose {
            self.console.error(&error.to_string());
        }
        outcome.fail(error)
    }

    fn announce(&self, verbose: bool, message: impl FnOnce() -> String) {
        if verbose {
            self.console.message(&message());
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
