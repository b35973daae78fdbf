//! Programming errors raised while discovering or building a dialog.

use thiserror::Error;

/// Malformed dialog metadata or a misbehaving entry definition.
///
/// These abort construction; no partially built dialog is ever shown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dialog member `{member}` is registered twice")]
    DuplicateMember { member: String },

    #[error("dialog member `{member}` has an empty display name")]
    EmptyName { member: String },

    #[error("action `{action}` declares an empty validation scope")]
    EmptyValidationScope { action: String },

    #[error("entry `{entry}` left the ui builder at nesting depth {found}/style depth {found_style} (expected {expected}/{expected_style})")]
    UnbalancedBuilder {
        entry: String,
        expected: usize,
        found: usize,
        expected_style: usize,
        found_style: usize,
    },

    #[error("surface `{title}` was destroyed before the dialog finished building")]
    SurfaceDestroyed { title: String },
}
