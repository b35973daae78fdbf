//! In-memory retained widget tree implementing the toolkit seam.
//!
//! The scene records every widget a dialog creates, keeps handlers for
//! buttons and editors, and lets callers simulate interaction. It backs the
//! headless tests and is the model the terminal front end renders and drives.
//!
//! Handlers are always cloned out of the node table before being invoked, so
//! a handler may freely create, update or destroy widgets of the same surface.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;

use dialogkit_types::EditorKind;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::toolkit::{
    CanvasSize, CommitHandler, EditorSpec, Host, LayoutKind, LayoutSpec, PressHandler, Surface, SurfaceKind, Task, WidgetId, WidgetStyle,
};

/// What a widget is, without its handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Layout(LayoutSpec),
    Text(String),
    Button(String),
    Editor {
        label: String,
        kind: EditorKind,
        value: JsonValue,
        mask: Option<char>,
    },
}

/// Snapshot of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    pub id: WidgetId,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub view: WidgetView,
    pub style: WidgetStyle,
    /// The widget's own enabled flag.
    pub enabled: bool,
    /// The widget's own active flag.
    pub active: bool,
}

enum Handler {
    None,
    Press(PressHandler),
    Commit(CommitHandler),
}

struct SceneNode {
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    view: WidgetView,
    style: WidgetStyle,
    enabled: bool,
    active: bool,
    handler: Handler,
}

impl SceneNode {
    fn new(parent: Option<WidgetId>, view: WidgetView, style: WidgetStyle, handler: Handler) -> Self {
        Self {
            parent,
            children: Vec::new(),
            view,
            style,
            enabled: true,
            active: true,
            handler,
        }
    }
}

pub struct SceneSurface {
    title: String,
    kind: SurfaceKind,
    size: CanvasSize,
    nodes: RefCell<Vec<SceneNode>>,
    teardown: RefCell<Vec<Task>>,
    destroyed: Cell<bool>,
    focused: Cell<Option<WidgetId>>,
}

impl SceneSurface {
    pub fn new(title: &str, kind: SurfaceKind, size: CanvasSize) -> Self {
        let root = SceneNode::new(
            None,
            WidgetView::Layout(LayoutSpec {
                kind: LayoutKind::Vertical,
                spacing: 0.0,
            }),
            WidgetStyle::default(),
            Handler::None,
        );
        Self {
            title: title.to_string(),
            kind,
            size,
            nodes: RefCell::new(vec![root]),
            teardown: RefCell::new(Vec::new()),
            destroyed: Cell::new(false),
            focused: Cell::new(None),
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    fn insert(&self, parent: WidgetId, view: WidgetView, style: &WidgetStyle, handler: Handler) -> WidgetId {
        let mut nodes = self.nodes.borrow_mut();
        let id = WidgetId::new(nodes.len());
        let parent = if parent.index() < nodes.len() { parent } else { WidgetId::new(0) };
        nodes.push(SceneNode::new(Some(parent), view, style.clone(), handler));
        nodes[parent.index()].children.push(id);
        id
    }

    fn update(&self, id: WidgetId, apply: impl FnOnce(&mut SceneNode)) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(id.index()) {
            apply(node);
        }
    }

    pub fn widget(&self, id: WidgetId) -> Option<WidgetSnapshot> {
        let nodes = self.nodes.borrow();
        nodes.get(id.index()).map(|node| WidgetSnapshot {
            id,
            parent: node.parent,
            children: node.children.clone(),
            view: node.view.clone(),
            style: node.style.clone(),
            enabled: node.enabled,
            active: node.active,
        })
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.nodes.borrow().get(id.index()).map(|node| node.children.clone()).unwrap_or_default()
    }

    /// Every widget in depth-first creation order, the root included.
    pub fn widgets(&self) -> Vec<WidgetId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        order
    }

    fn chain_holds(&self, id: WidgetId, flag: impl Fn(&SceneNode) -> bool) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(id);
        while let Some(index) = current {
            match nodes.get(index.index()) {
                Some(node) if flag(node) => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Whether the widget and every ancestor are active.
    pub fn is_shown(&self, id: WidgetId) -> bool {
        self.chain_holds(id, |node| node.active)
    }

    /// Whether the widget and every ancestor are enabled.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.chain_holds(id, |node| node.enabled)
    }

    /// Shown, enabled, and the surface is still alive.
    pub fn is_interactive(&self, id: WidgetId) -> bool {
        !self.destroyed.get() && self.is_shown(id) && self.is_enabled(id)
    }

    pub fn text_of(&self, id: WidgetId) -> Option<String> {
        match self.widget(id)?.view {
            WidgetView::Text(content) => Some(content),
            _ => None,
        }
    }

    pub fn value_of(&self, id: WidgetId) -> Option<JsonValue> {
        match self.widget(id)?.view {
            WidgetView::Editor { value, .. } => Some(value),
            _ => None,
        }
    }

    fn find(&self, matches: impl Fn(&WidgetView) -> bool) -> Option<WidgetId> {
        self.widgets().into_iter().find(|id| self.widget(*id).is_some_and(|widget| matches(&widget.view)))
    }

    pub fn find_button(&self, label: &str) -> Option<WidgetId> {
        self.find(|view| matches!(view, WidgetView::Button(text) if text == label))
    }

    pub fn find_editor(&self, label: &str) -> Option<WidgetId> {
        self.find(|view| matches!(view, WidgetView::Editor { label: text, .. } if text == label))
    }

    pub fn find_text(&self, content: &str) -> Option<WidgetId> {
        self.find(|view| matches!(view, WidgetView::Text(text) if text == content))
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused.get()
    }

    /// Simulates a button press. Ignored unless the button is interactive.
    pub fn press(&self, id: WidgetId) -> bool {
        if !self.is_interactive(id) {
            return false;
        }
        let handler = match self.nodes.borrow().get(id.index()).map(|node| &node.handler) {
            Some(Handler::Press(handler)) => Rc::clone(handler),
            _ => return false,
        };
        handler();
        true
    }

    /// Simulates a user edit: stores `value` in the editor and fires its
    /// commit handler. Ignored unless the editor is interactive.
    pub fn commit(&self, id: WidgetId, value: JsonValue) -> bool {
        if !self.is_interactive(id) {
            return false;
        }
        let handler = {
            let mut nodes = self.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(id.index()) else {
                return false;
            };
            let handler = match &node.handler {
                Handler::Commit(handler) => Rc::clone(handler),
                _ => return false,
            };
            if let WidgetView::Editor { value: current, .. } = &mut node.view {
                *current = value.clone();
            }
            handler
        };
        handler(value);
        true
    }
}

impl Surface for SceneSurface {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn root(&self) -> WidgetId {
        WidgetId::new(0)
    }

    fn add_layout(&self, parent: WidgetId, layout: LayoutSpec, style: &WidgetStyle) -> WidgetId {
        self.insert(parent, WidgetView::Layout(layout), style, Handler::None)
    }

    fn add_text(&self, parent: WidgetId, content: &str, style: &WidgetStyle) -> WidgetId {
        self.insert(parent, WidgetView::Text(content.to_string()), style, Handler::None)
    }

    fn add_button(&self, parent: WidgetId, label: &str, style: &WidgetStyle, on_press: PressHandler) -> WidgetId {
        self.insert(parent, WidgetView::Button(label.to_string()), style, Handler::Press(on_press))
    }

    fn add_editor(&self, parent: WidgetId, spec: EditorSpec, style: &WidgetStyle, on_commit: CommitHandler) -> WidgetId {
        let view = WidgetView::Editor {
            label: spec.label,
            kind: spec.kind,
            value: spec.value,
            mask: spec.mask,
        };
        self.insert(parent, view, style, Handler::Commit(on_commit))
    }

    fn set_text(&self, id: WidgetId, content: &str) {
        self.update(id, |node| {
            if let WidgetView::Text(text) = &mut node.view {
                content.clone_into(text);
            }
        });
    }

    fn set_value(&self, id: WidgetId, value: JsonValue) {
        self.update(id, |node| {
            if let WidgetView::Editor { value: current, .. } = &mut node.view {
                *current = value;
            }
        });
    }

    fn set_enabled(&self, id: WidgetId, enabled: bool) {
        self.update(id, |node| node.enabled = enabled);
    }

    fn set_active(&self, id: WidgetId, active: bool) {
        self.update(id, |node| node.active = active);
    }

    fn is_active(&self, id: WidgetId) -> bool {
        self.nodes.borrow().get(id.index()).is_some_and(|node| node.active)
    }

    fn focus(&self, id: WidgetId) {
        self.focused.set(Some(id));
    }

    fn on_teardown(&self, hook: Task) {
        if self.destroyed.get() {
            return;
        }
        self.teardown.borrow_mut().push(hook);
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let hooks = mem::take(&mut *self.teardown.borrow_mut());
        for hook in hooks {
            hook();
        }
        let released: Vec<Handler> = self
            .nodes
            .borrow_mut()
            .iter_mut()
            .map(|node| mem::replace(&mut node.handler, Handler::None))
            .collect();
        info!(title = %self.title, handlers = released.len(), "destroyed surface");
        drop(released);
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

/// Opens [`SceneSurface`]s and queues deferred work.
#[derive(Default)]
pub struct SceneHost {
    surfaces: RefCell<Vec<Rc<SceneSurface>>>,
    pending: RefCell<VecDeque<Task>>,
}

impl SceneHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Live surfaces in opening order.
    pub fn surfaces(&self) -> Vec<Rc<SceneSurface>> {
        let mut surfaces = self.surfaces.borrow_mut();
        surfaces.retain(|surface| !surface.is_destroyed());
        surfaces.clone()
    }

    /// The most recently opened live surface.
    pub fn top(&self) -> Option<Rc<SceneSurface>> {
        self.surfaces().pop()
    }

    pub fn is_idle(&self) -> bool {
        self.surfaces().is_empty()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Runs queued tasks, including tasks queued while draining, and returns
    /// how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            debug!(tasks = ran, "ran deferred tasks");
        }
        ran
    }

    /// Destroys every live surface, newest first.
    pub fn close_all(&self) {
        for surface in self.surfaces().into_iter().rev() {
            surface.destroy();
        }
    }
}

impl Host for SceneHost {
    fn open_surface(&self, title: &str, kind: SurfaceKind, size: CanvasSize) -> Rc<dyn Surface> {
        let surface = Rc::new(SceneSurface::new(title, kind, size));
        self.surfaces.borrow_mut().push(Rc::clone(&surface));
        debug!(title, ?kind, "opened surface");
        surface
    }

    fn run_synchronously(&self, task: Task) {
        self.pending.borrow_mut().push_back(task);
    }
}
