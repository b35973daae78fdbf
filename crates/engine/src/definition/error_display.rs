use std::rc::Rc;

use dialogkit_types::SchemaError;

use super::EntryDefinition;
use crate::element::{Element, ErrorDisplayElement};
use crate::state::{DialogState, OnChange, SharedState};
use crate::toolkit::{Alignment, Tone};
use crate::ui_builder::UiBuilder;

/// Multi-line read-only text listing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDisplayDefinition {
    only_unbound: bool,
    lines: Option<usize>,
}

impl ErrorDisplayDefinition {
    /// Shows every error of a pass.
    pub fn all() -> Self {
        Self {
            only_unbound: false,
            lines: None,
        }
    }

    /// Shows only errors no other element claims.
    pub fn unbound() -> Self {
        Self {
            only_unbound: true,
            lines: None,
        }
    }

    /// Reserves `lines` lines of text instead of the configured default.
    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = Some(lines);
        self
    }

    pub fn only_unbound(&self) -> bool {
        self.only_unbound
    }
}

impl<S: DialogState> EntryDefinition<S> for ErrorDisplayDefinition {
    fn label(&self) -> String {
        if self.only_unbound { "unbound errors".to_string() } else { "all errors".to_string() }
    }

    fn create(&self, ui: &mut UiBuilder, _dialog: &SharedState<S>, _on_change: &OnChange, _in_private: bool) -> Result<Rc<dyn Element>, SchemaError> {
        let config = Rc::clone(ui.config());
        let lines = self.lines.unwrap_or(config.error_display_lines);
        ui.push_style_with(|style| {
            style.tone = Tone::Error;
            style.alignment = Alignment::Right;
            style.preferred_height = Some(lines as f32 * config.error_height);
        });
        let text = ui.text("");
        ui.pop_style();
        Ok(Rc::new(ErrorDisplayElement::new(Rc::clone(ui.surface()), text, self.only_unbound)))
    }
}
