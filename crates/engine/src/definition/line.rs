use std::rc::Rc;

use dialogkit_types::{ErrorKey, SchemaError};

use super::{EntryDefinition, EntryRef, create_checked};
use crate::container::ElementContainer;
use crate::element::Element;
use crate::state::{DialogState, OnChange, SharedState};
use crate::ui_builder::UiBuilder;

/// A horizontal row of entries sharing the available width.
pub struct LineDefinition<S: DialogState> {
    key: Option<ErrorKey>,
    entries: Vec<EntryRef<S>>,
}

impl<S: DialogState> LineDefinition<S> {
    pub fn new(entries: Vec<EntryRef<S>>) -> Self {
        Self { key: None, entries }
    }

    /// Gives the built container a key so bulk operations can address it.
    pub fn keyed(mut self, key: impl Into<ErrorKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn push(mut self, entry: impl EntryDefinition<S> + 'static) -> Self {
        self.entries.push(Rc::new(entry));
        self
    }

    pub fn entries(&self) -> &[EntryRef<S>] {
        &self.entries
    }
}

impl<S: DialogState> Clone for LineDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<S: DialogState> EntryDefinition<S> for LineDefinition<S> {
    fn label(&self) -> String {
        match &self.key {
            Some(key) => format!("line `{key}`"),
            None => format!("line of {}", self.entries.len()),
        }
    }

    fn create(&self, ui: &mut UiBuilder, dialog: &SharedState<S>, on_change: &OnChange, in_private: bool) -> Result<Rc<dyn Element>, SchemaError> {
        let spacing = ui.config().spacing;
        let root = ui.horizontal(spacing);
        ui.push_style_with(|style| style.flexible_width = Some(1.0));

        let mut children = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match create_checked(entry.as_ref(), ui, dialog, on_change, in_private) {
                Ok(child) => children.push(child),
                Err(error) => {
                    ui.pop_style();
                    ui.nest_out();
                    return Err(error);
                }
            }
        }

        ui.pop_style();
        ui.nest_out();
        Ok(Rc::new(ElementContainer::new(self.key.clone(), Rc::clone(ui.surface()), root, children)))
    }
}
