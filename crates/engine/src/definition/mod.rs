//! Stateless entry definitions and the elements they materialize.
//!
//! A definition describes one piece of dialog UI. It can be built any number
//! of times, into any surface; each build yields a fresh [`Element`] bound to
//! the given state. Definitions are shared through `Rc` so the same option can
//! appear in a dialog and in the pop-up that edits it.

mod action;
mod error_display;
mod line;
mod option;

use std::rc::Rc;

use dialogkit_types::SchemaError;
use tracing::trace;

use crate::element::Element;
use crate::state::{DialogState, OnChange, SharedState};
use crate::ui_builder::UiBuilder;

pub use action::{ActionDefinition, ActionElement};
pub use error_display::ErrorDisplayDefinition;
pub use line::LineDefinition;
pub use option::{OptionDefinition, OptionElement};

pub trait EntryDefinition<S: DialogState> {
    /// Short description used in logs and errors.
    fn label(&self) -> String;

    /// Builds the widgets for this entry under the cursor's current parent.
    ///
    /// `on_change` runs one reconciliation pass of the dialog being built.
    /// `in_private` is set when building inside a private surface, where
    /// secret options get a masked editor instead of a pop-up trigger.
    /// Implementations must leave `ui` at the nesting and style depth they
    /// found it at.
    fn create(&self, ui: &mut UiBuilder, dialog: &SharedState<S>, on_change: &OnChange, in_private: bool) -> Result<Rc<dyn Element>, SchemaError>;
}

pub type EntryRef<S> = Rc<dyn EntryDefinition<S>>;

/// Runs [`EntryDefinition::create`] and rejects definitions that leave the
/// builder unbalanced.
pub fn create_checked<S: DialogState>(
    definition: &dyn EntryDefinition<S>,
    ui: &mut UiBuilder,
    dialog: &SharedState<S>,
    on_change: &OnChange,
    in_private: bool,
) -> Result<Rc<dyn Element>, SchemaError> {
    let expected = ui.depth();
    let expected_style = ui.style_depth();
    trace!(entry = %definition.label(), depth = expected, in_private, "building entry");

    let element = definition.create(ui, dialog, on_change, in_private)?;

    let found = ui.depth();
    let found_style = ui.style_depth();
    if found != expected || found_style != expected_style {
        return Err(SchemaError::UnbalancedBuilder {
            entry: definition.label(),
            expected,
            found,
            expected_style,
            found_style,
        });
    }
    Ok(element)
}
