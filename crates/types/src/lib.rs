//! # Dialogkit Types
//!
//! Plain data contracts shared by the dialog engine and its front ends.
//!
//! - **`errors`**: error keys, the per-pass [`ErrorMap`] and its bound/unbound
//!   partition ([`ErrorReport`]).
//! - **`descriptor`**: metadata attached to dialog members (options and actions).
//! - **`value`**: the closed set of editor kinds and the [`FieldValue`] contract
//!   that moves field values in and out of editors.
//! - **`mapper`**: reversible mappers that let unsupported field types be edited
//!   through a supported proxy type.
//! - **`schema`**: programming errors detected while discovering or building a dialog.

pub mod descriptor;
pub mod errors;
pub mod mapper;
pub mod schema;
pub mod value;

pub use descriptor::{ActionDescriptor, OptionDescriptor};
pub use errors::{BoundKeySet, ErrorKey, ErrorMap, ErrorReport};
pub use mapper::{DelimitedList, ParsedText, ReversibleMapper};
pub use schema::SchemaError;
pub use value::{EditorKind, FieldValue, Reference, ValueKind};
