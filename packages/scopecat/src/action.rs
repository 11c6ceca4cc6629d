//! Multi-mode catalog actions.
//!
//! Commands accept a loose combination of options (a name, a payload, a
//! comment, `--delete`, `--all`) and dispatch on whichever are present.
//! [`Action`] captures that combination, rejects the ones that make no
//! sense, and runs the rest against a catalog.

use bon::Builder;
use derive_more::{Display, Error};
use serde_json::Value;

use crate::catalog::{Outcome, Query, ScopedCatalog};
use crate::console::Console;

/// A combination of catalog operations to perform together.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Action {
    /// `name[@scope]` targeted by set, comment and delete; filters show.
    #[builder(into)]
    pub name: Option<String>,

    /// Payload to set.
    pub payload: Option<Value>,

    /// Comment to set.
    #[builder(into)]
    pub comment: Option<String>,

    #[builder(default)]
    pub delete: bool,

    #[builder(default)]
    pub show: bool,

    /// Show every scope instead of only the active ones.
    #[builder(default)]
    pub all: bool,

    /// Ask before deleting.
    #[builder(default = true)]
    pub confirm: bool,
}

/// Option combinations that are rejected before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ActionError {
    #[display("Catalog action requires a name.")]
    NameRequired,

    #[display("Catalog delete action may not be combined with set action.")]
    DeleteWithSet,

    #[display("Catalog set comment action may not be combined with delete or show action.")]
    CommentWithDeleteOrShow,

    #[display("All option only applies to catalog show action.")]
    AllWithoutShow,
}

/// How a validated action turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Every operation succeeded and any changes were saved.
    Succeeded,

    /// An operation reported errors or the catalog could not be saved.
    /// Errors were already reported through the catalog console.
    Failed,
}

impl Action {
    /// Check that the options form a sensible combination.
    pub fn validate(&self) -> Result<(), ActionError> {
        let sets = self.payload.is_some() || self.comment.is_some();
        if self.name.is_none() && (self.delete || sets) {
            return Err(ActionError::NameRequired);
        }
        if self.delete && sets {
            return Err(ActionError::DeleteWithSet);
        }
        if self.comment.is_some() && (self.delete || self.show) {
            return Err(ActionError::CommentWithDeleteOrShow);
        }
        if self.all && (self.delete || sets) {
            return Err(ActionError::AllWithoutShow);
        }
        Ok(())
    }
}

/// Validate and run `action` against `catalog`.
///
/// Operations run in order: set, comment, delete, show. The catalog is saved
/// afterwards only if nothing failed.
#[tracing::instrument(skip(catalog))]
pub fn run<C: Console>(
    catalog: &mut ScopedCatalog<C>,
    action: &Action,
) -> Result<ActionOutcome, ActionError> {
    action.validate()?;

    let name = action.name.as_deref();
    let mut outcomes: Vec<Outcome> = Vec::new();
    if let Some((name, payload)) = name.zip(action.payload.as_ref()) {
        outcomes.push(catalog.set(name, payload.clone(), true));
    }
    if let Some((name, comment)) = name.zip(action.comment.as_deref()) {
        outcomes.push(catalog.comment(name, comment, true));
    }
    if let Some(name) = name.filter(|_| action.delete) {
        outcomes.push(catalog.delete(name, true, action.confirm));
    }
    if action.show {
        let query = Query {
            name: action.name.clone(),
            active: (!action.all).then_some(true),
            ..Query::default()
        };
        catalog.show(&query);
    }

    if outcomes.iter().any(|outcome| !outcome.is_ok()) {
        tracing::debug!(?outcomes, "action failed");
        return Ok(ActionOutcome::Failed);
    }
    let persisted = catalog.config().path.is_some();
    if persisted && catalog.is_modified() && !catalog.save() {
        return Ok(ActionOutcome::Failed);
    }
    Ok(ActionOutcome::Succeeded)
}
