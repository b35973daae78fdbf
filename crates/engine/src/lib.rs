//! # Dialogkit Engine
//!
//! Builds declarative dialogs from a dialog state type and keeps the built
//! widgets in sync with that state.
//!
//! A state type implements [`DialogState`] (validation and tear-down) and
//! usually [`DialogSchema`], which registers its editable fields ("options")
//! and zero-argument operations ("actions"). A [`DialogBuilder`] turns the
//! registered members, plus any hand-composed [`EntryDefinition`]s, into
//! elements on a [`Surface`]. Every edit triggers one reconciliation pass:
//! the state validates, the resulting [`ErrorMap`] is split into errors some
//! element claims and unbound errors, and both are fanned out to the
//! elements, which update their error text and action buttons.
//!
//! ## Architecture
//!
//! - **`toolkit`** / **`ui_builder`**: the seam to a rendering toolkit and the
//!   nesting cursor definitions build through
//! - **`definition`** / **`element`** / **`container`**: stateless entry
//!   definitions and the live elements they produce
//! - **`discovery`**: the registration pass yielding a type's members
//! - **`reconcile`** / **`dialog`** / **`builder`**: passes, built dialogs and
//!   windows
//! - **`popup`**: private sub-dialogs for secret options
//! - **`scene`**: an in-memory toolkit used headlessly and by the terminal UI
//!
//! ## Usage
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use dialogkit_engine::scene::SceneHost;
//! use dialogkit_engine::{DialogBuilder, DialogConfig, DialogSchema, DialogState, Host, MemberRegistry, shared};
//! use dialogkit_types::{ActionDescriptor, ErrorMap, OptionDescriptor};
//!
//! #[derive(Default)]
//! struct Rename {
//!     name: String,
//! }
//!
//! impl DialogState for Rename {
//!     fn update_and_validate(&mut self) -> ErrorMap {
//!         let mut errors = ErrorMap::new();
//!         if self.name.is_empty() {
//!             errors.insert("name", "Missing name");
//!         }
//!         errors
//!     }
//!
//!     fn on_destroy(&mut self) {}
//! }
//!
//! impl DialogSchema for Rename {
//!     fn describe(members: &mut MemberRegistry<Self>) {
//!         members
//!             .option("name", OptionDescriptor::new("Name"), |state| &mut state.name)
//!             .action("apply", ActionDescriptor::new("Apply"), |_state| {});
//!     }
//! }
//!
//! let host = SceneHost::new();
//! let window = DialogBuilder::<Rename>::new()
//!     .build_window("Rename", host.clone() as Rc<dyn Host>, Rc::new(DialogConfig::default()), shared(Rename::default()))?;
//! assert!(window.dialog().revalidate().all.contains_key("name"));
//! # Ok::<(), dialogkit_types::SchemaError>(())
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod definition;
pub mod dialog;
pub mod discovery;
pub mod element;
pub mod field;
pub mod popup;
pub mod reconcile;
pub mod scene;
pub mod state;
pub mod toolkit;
pub mod ui_builder;

pub use builder::{DialogBuilder, Window};
pub use config::{ConfigError, DialogConfig, DialogLabels};
pub use container::{DialogHandle, ElementContainer};
pub use definition::{ActionDefinition, EntryDefinition, EntryRef, ErrorDisplayDefinition, LineDefinition, OptionDefinition, create_checked};
pub use dialog::Dialog;
pub use discovery::{DialogSchema, MemberRegistry, Members, discover};
pub use element::{Element, ElementCore, ErrorDisplayElement};
pub use field::{FieldBinding, FieldLens, WriteOutcome, lens};
pub use popup::SecretPopup;
pub use state::{DialogState, OnChange, SharedState, ValidationSource, shared};
pub use toolkit::{
    Alignment, CanvasSize, CommitHandler, EditorSpec, Host, LayoutKind, LayoutSpec, PressHandler, Surface, SurfaceKind, Task, Tone, WidgetId,
    WidgetStyle,
};
pub use ui_builder::UiBuilder;

pub use dialogkit_types as types;
