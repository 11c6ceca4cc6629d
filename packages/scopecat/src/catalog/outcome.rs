//! Operation results and the catalog error taxonomy.

use derive_more::{Display, Error};
use serde_json::Value;

use super::name::{GLOBAL_SCOPE, GLOBAL_SCOPE_DISPLAY_NAME, MISSING_SCOPE_DISPLAY_NAME};

/// Broad classes of catalog errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCategory {
    /// A locked catalog refused to create an item.
    CreationNotAllowed,

    /// A scoped payload was set before the item had a global one.
    MissingPrerequisite,

    /// The target item or scoped payload does not exist.
    NotFound,

    /// The operation is not permitted in this form or on a locked catalog.
    InvalidOperation,

    /// The user declined the confirmation prompt.
    UserDeclined,
}

/// Validation failures reported by catalog operations.
///
/// `label` fields carry the catalog's item or payload label so the message
/// reads naturally for the catalog at hand, e.g. "alias" or "parameter".
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CatalogError {
    #[display("Not allowed to create new {label}: {name}")]
    CreateNotAllowed { label: String, name: String },

    #[display("Must set global {label} as default before setting scoped one for: {name}")]
    GlobalRequired { label: String, name: String },

    #[display("Not allowed to delete {label}: {name}")]
    DeleteNotAllowed { label: String, name: String },

    #[display("Unable to delete missing {label}: {name}")]
    MissingItem { label: String, name: String },

    #[display("Not allowed to delete global {label}: {name}")]
    GlobalDeleteNotAllowed { label: String, name: String },

    #[display("Unable to delete missing scoped {label}: {scoped_name}")]
    MissingScopedPayload { label: String, scoped_name: String },

    #[display("Delete action abandoned: {scoped_name}")]
    Abandoned { scoped_name: String },

    #[display("Not allowed to rename {label}: {name}")]
    RenameNotAllowed { label: String, name: String },

    #[display("Rename {label} does not accept \"@scope\" specifiers.")]
    RenameScoped { label: String },

    #[display("Source {label} missing for rename: {name}")]
    RenameSourceMissing { label: String, name: String },

    #[display("Target {label} already exists for rename: {name}")]
    RenameTargetExists { label: String, name: String },

    #[display("Not allowed to set {label} comment: {name}")]
    CommentNotAllowed { label: String, name: String },

    #[display("Set {label} comment does not accept \"@scope\" specifier: {scoped_name}")]
    CommentScoped { label: String, scoped_name: String },

    #[display("Target {label} missing when setting comment: {name}")]
    CommentTargetMissing { label: String, name: String },
}

impl CatalogError {
    /// The broad class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CreateNotAllowed { .. } => ErrorCategory::CreationNotAllowed,
            Self::GlobalRequired { .. } => ErrorCategory::MissingPrerequisite,
            Self::MissingItem { .. }
            | Self::MissingScopedPayload { .. }
            | Self::RenameSourceMissing { .. }
            | Self::CommentTargetMissing { .. } => ErrorCategory::NotFound,
            Self::DeleteNotAllowed { .. }
            | Self::GlobalDeleteNotAllowed { .. }
            | Self::RenameNotAllowed { .. }
            | Self::RenameScoped { .. }
            | Self::RenameTargetExists { .. }
            | Self::CommentNotAllowed { .. }
            | Self::CommentScoped { .. } => ErrorCategory::InvalidOperation,
            Self::Abandoned { .. } => ErrorCategory::UserDeclined,
        }
    }
}

/// The result of a catalog operation.
///
/// Operations never fail by returning `Err`; validation problems land in
/// `errors` and leave the catalog untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Item name parsed from the scoped name.
    pub name: String,

    /// Normalized scope parsed from the scoped name, `None` if unspecified.
    pub scope: Option<String>,

    /// Whether the item existed when the name was resolved.
    pub item_exists: bool,

    /// The scope the operation resolved to, `None` if nothing was found.
    pub found_scope: Option<String>,

    /// The payload at `found_scope`, `None` if nothing was found.
    pub found_payload: Option<Value>,

    /// Validation errors; empty on success.
    pub errors: Vec<CatalogError>,
}

impl Outcome {
    /// Whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `found_scope` as shown to users.
    pub fn found_scope_display(&self) -> &str {
        match self.found_scope.as_deref() {
            None => MISSING_SCOPE_DISPLAY_NAME,
            Some(GLOBAL_SCOPE) => GLOBAL_SCOPE_DISPLAY_NAME,
            Some(scope) => scope,
        }
    }

    /// Record a failure, dropping any lookup results.
    pub(crate) fn fail(mut self, error: CatalogError) -> Self {
        self.found_scope = None;
        self.found_payload = None;
        self.errors.push(error);
        self
    }
}
