//! Live, per-instance UI bindings materialized from entry definitions.
//!
//! Every element owns one root widget. Enablement is tracked as two flags:
//! the element's own flag and the flag inherited from its parent container.
//! The effective value is their conjunction and is pushed to the widget (and,
//! for containers, to the children) as soon as either flag changes.
//! Visibility is a direct pass-through to the root widget's active flag.

use std::cell::Cell;
use std::rc::Rc;

use dialogkit_types::{BoundKeySet, ErrorKey, ErrorMap};

use crate::container::ElementContainer;
use crate::toolkit::{Surface, WidgetId};

/// State shared by every element kind.
pub struct ElementCore {
    key: Option<ErrorKey>,
    surface: Rc<dyn Surface>,
    root: WidgetId,
    own_enabled: Cell<bool>,
    parent_enabled: Cell<bool>,
}

impl ElementCore {
    pub fn new(key: Option<ErrorKey>, surface: Rc<dyn Surface>, root: WidgetId) -> Self {
        Self {
            key,
            surface,
            root,
            own_enabled: Cell::new(true),
            parent_enabled: Cell::new(true),
        }
    }

    pub fn key(&self) -> Option<&ErrorKey> {
        self.key.as_ref()
    }

    pub fn surface(&self) -> &Rc<dyn Surface> {
        &self.surface
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn is_effectively_enabled(&self) -> bool {
        self.own_enabled.get() && self.parent_enabled.get()
    }
}

pub trait Element {
    fn core(&self) -> &ElementCore;

    /// Error keys this element displays. Collected once at build time.
    fn bound_error_keys(&self) -> BoundKeySet;

    /// Receives one reconciliation pass worth of errors.
    fn display_errors(&self, all: &ErrorMap, unbound: &ErrorMap);

    /// Re-reads the bound state into the widgets.
    fn reset(&self) {}

    /// Pushes the effective enabled flag to the widgets.
    fn apply_enabled(&self) {
        let core = self.core();
        core.surface.set_enabled(core.root, core.is_effectively_enabled());
    }

    fn key(&self) -> Option<&ErrorKey> {
        self.core().key()
    }

    fn root(&self) -> WidgetId {
        self.core().root
    }

    fn visible(&self) -> bool {
        let core = self.core();
        core.surface.is_active(core.root)
    }

    fn set_visible(&self, visible: bool) {
        let core = self.core();
        core.surface.set_active(core.root, visible);
    }

    /// The element's own flag, ignoring its ancestors.
    fn enabled(&self) -> bool {
        self.core().own_enabled.get()
    }

    fn parent_enabled(&self) -> bool {
        self.core().parent_enabled.get()
    }

    fn is_effectively_enabled(&self) -> bool {
        self.core().is_effectively_enabled()
    }

    fn set_enabled(&self, enabled: bool) {
        self.core().own_enabled.set(enabled);
        self.apply_enabled();
    }

    fn set_parent_enabled(&self, enabled: bool) {
        self.core().parent_enabled.set(enabled);
        self.apply_enabled();
    }

    /// Composite elements expose their children here.
    fn as_container(&self) -> Option<&ElementContainer> {
        None
    }

    fn has_key(&self, key: &str) -> bool {
        self.key().is_some_and(|own| own.as_str() == key)
    }
}

/// Read-only text showing error messages that no other element claims, or
/// every error when configured so.
pub struct ErrorDisplayElement {
    core: ElementCore,
    only_unbound: bool,
}

impl ErrorDisplayElement {
    pub fn new(surface: Rc<dyn Surface>, text: WidgetId, only_unbound: bool) -> Self {
        Self {
            core: ElementCore::new(None, surface, text),
            only_unbound,
        }
    }
}

impl Element for ErrorDisplayElement {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn bound_error_keys(&self) -> BoundKeySet {
        BoundKeySet::new()
    }

    fn display_errors(&self, all: &ErrorMap, unbound: &ErrorMap) {
        let shown = if self.only_unbound { unbound } else { all };
        self.core.surface.set_text(self.core.root, &shown.joined("\n"));
    }
}
