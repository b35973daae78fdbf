//! A nesting and style cursor over one [`Surface`].
//!
//! Entry definitions never address widgets directly. They ask the builder to
//! open layouts (which become the parent of subsequent widgets), to create
//! leaf widgets under the current parent, and to push styles that apply to
//! everything created until the matching pop. A definition must leave the
//! builder at the nesting depth and style depth it found it at; see
//! [`crate::definition::create_checked`].

use std::mem;
use std::rc::Rc;

use crate::config::DialogConfig;
use crate::toolkit::{CommitHandler, EditorSpec, Host, LayoutKind, LayoutSpec, PressHandler, Surface, WidgetId, WidgetStyle};

pub struct UiBuilder {
    surface: Rc<dyn Surface>,
    host: Rc<dyn Host>,
    config: Rc<DialogConfig>,
    parents: Vec<WidgetId>,
    style: WidgetStyle,
    styles: Vec<WidgetStyle>,
    first_editor: Option<WidgetId>,
}

impl UiBuilder {
    /// Starts a cursor at the root of `surface` with the default style.
    pub fn new(surface: Rc<dyn Surface>, host: Rc<dyn Host>, config: Rc<DialogConfig>) -> Self {
        let root = surface.root();
        Self {
            surface,
            host,
            config,
            parents: vec![root],
            style: WidgetStyle::default(),
            styles: Vec::new(),
            first_editor: None,
        }
    }

    pub fn surface(&self) -> &Rc<dyn Surface> {
        &self.surface
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    pub fn config(&self) -> &Rc<DialogConfig> {
        &self.config
    }

    /// Number of open layouts, the surface root included.
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    pub fn style_depth(&self) -> usize {
        self.styles.len()
    }

    pub fn style(&self) -> &WidgetStyle {
        &self.style
    }

    /// The first editor created through this cursor, if any.
    pub fn first_editor(&self) -> Option<WidgetId> {
        self.first_editor
    }

    fn parent(&self) -> WidgetId {
        self.parents.last().copied().unwrap_or_else(|| self.surface.root())
    }

    /// Replaces the current style until the matching [`UiBuilder::pop_style`].
    pub fn push_style(&mut self, style: WidgetStyle) {
        let previous = mem::replace(&mut self.style, style);
        self.styles.push(previous);
    }

    /// Pushes a copy of the current style changed by `edit`.
    pub fn push_style_with(&mut self, edit: impl FnOnce(&mut WidgetStyle)) {
        let mut style = self.style.clone();
        edit(&mut style);
        self.push_style(style);
    }

    pub fn pop_style(&mut self) {
        if let Some(previous) = self.styles.pop() {
            self.style = previous;
        }
    }

    fn layout(&mut self, kind: LayoutKind, spacing: f32) -> WidgetId {
        let id = self.surface.add_layout(self.parent(), LayoutSpec { kind, spacing }, &self.style);
        self.parents.push(id);
        id
    }

    /// Opens a top-to-bottom layout and makes it the current parent.
    pub fn vertical(&mut self, spacing: f32) -> WidgetId {
        self.layout(LayoutKind::Vertical, spacing)
    }

    /// Opens a left-to-right layout and makes it the current parent.
    pub fn horizontal(&mut self, spacing: f32) -> WidgetId {
        self.layout(LayoutKind::Horizontal, spacing)
    }

    pub fn scroll_area(&mut self) -> WidgetId {
        self.layout(LayoutKind::Scroll, 0.0)
    }

    /// Opens a framed left-to-right group.
    pub fn panel(&mut self) -> WidgetId {
        let spacing = self.config.spacing;
        self.layout(LayoutKind::Panel, spacing)
    }

    /// Closes the innermost open layout.
    pub fn nest_out(&mut self) {
        self.parents.pop();
    }

    pub fn text(&mut self, content: &str) -> WidgetId {
        self.surface.add_text(self.parent(), content, &self.style)
    }

    pub fn button(&mut self, label: &str, on_press: PressHandler) -> WidgetId {
        self.surface.add_button(self.parent(), label, &self.style, on_press)
    }

    pub fn editor(&mut self, spec: EditorSpec, on_commit: CommitHandler) -> WidgetId {
        let id = self.surface.add_editor(self.parent(), spec, &self.style, on_commit);
        self.first_editor.get_or_insert(id);
        id
    }
}
