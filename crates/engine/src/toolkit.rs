//! The narrow seam between the dialog engine and a rendering toolkit.
//!
//! The engine never interprets toolkit state. It asks a [`Surface`] to create
//! widgets under a parent, keeps the returned [`WidgetId`]s, and later pushes
//! text, values, enablement and visibility into them. A [`Host`] opens
//! surfaces and owns the single execution context everything runs on.

use std::fmt;
use std::rc::Rc;

use dialogkit_types::EditorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Handle to a widget inside one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a surface belongs to the regular scene or to an isolated context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// A dialog window shown in the shared scene.
    Dialog,
    /// An isolated surface for sensitive input (secret pop-ups).
    Private,
}

/// Requested canvas size of a surface, in toolkit units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Vertical,
    Horizontal,
    Scroll,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    pub spacing: f32,
}

/// Semantic colouring of text widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Normal,
    Label,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// Style applied to widgets created by a [`crate::UiBuilder`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetStyle {
    pub preferred_height: Option<f32>,
    pub flexible_width: Option<f32>,
    pub tone: Tone,
    pub alignment: Alignment,
}

/// Everything a toolkit needs to create a value or reference editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSpec {
    pub label: String,
    pub kind: EditorKind,
    pub value: JsonValue,
    /// Replaces every displayed character when set.
    pub mask: Option<char>,
}

pub type PressHandler = Rc<dyn Fn()>;
pub type CommitHandler = Rc<dyn Fn(JsonValue)>;
pub type Task = Box<dyn FnOnce()>;

/// A retained widget tree of one window.
///
/// Methods take `&self`; implementations use interior mutability and must not
/// hold internal borrows while invoking press or commit handlers, because
/// handlers re-enter the surface.
pub trait Surface {
    fn title(&self) -> String;

    fn kind(&self) -> SurfaceKind;

    fn root(&self) -> WidgetId;

    fn add_layout(&self, parent: WidgetId, layout: LayoutSpec, style: &WidgetStyle) -> WidgetId;

    fn add_text(&self, parent: WidgetId, content: &str, style: &WidgetStyle) -> WidgetId;

    fn add_button(&self, parent: WidgetId, label: &str, style: &WidgetStyle, on_press: PressHandler) -> WidgetId;

    fn add_editor(&self, parent: WidgetId, spec: EditorSpec, style: &WidgetStyle, on_commit: CommitHandler) -> WidgetId;

    fn set_text(&self, id: WidgetId, content: &str);

    /// Replaces an editor's value without firing its commit handler.
    fn set_value(&self, id: WidgetId, value: JsonValue);

    fn set_enabled(&self, id: WidgetId, enabled: bool);

    /// Sets the widget's own active flag; inactive widgets hide their subtree.
    fn set_active(&self, id: WidgetId, active: bool);

    fn is_active(&self, id: WidgetId) -> bool;

    fn focus(&self, id: WidgetId);

    /// Registers a hook that runs once when tear-down begins, before any
    /// widget resources are released.
    fn on_teardown(&self, hook: Task);

    /// Tears the surface down. Calling it again is a no-op.
    fn destroy(&self);

    fn is_destroyed(&self) -> bool;
}

/// Opens surfaces and owns the execution context dialogs run on.
pub trait Host {
    fn open_surface(&self, title: &str, kind: SurfaceKind, size: CanvasSize) -> Rc<dyn Surface>;

    /// Queues `task` to run on the owning context after the current event.
    fn run_synchronously(&self, task: Task);
}
