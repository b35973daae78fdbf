//! Composite elements and bulk operations over their direct children.
//!
//! Bulk operations match children by element key and never descend on their
//! own. A child that is itself a container applies enablement and reset to
//! its own children when it receives them, so a call on the root reaches the
//! whole tree without a global walk.

use std::rc::{Rc, Weak};

use dialogkit_types::{BoundKeySet, ErrorKey, ErrorMap};

use crate::element::{Element, ElementCore};
use crate::toolkit::{Surface, WidgetId};

pub struct ElementContainer {
    core: ElementCore,
    children: Vec<Rc<dyn Element>>,
}

impl ElementContainer {
    pub fn new(key: Option<ErrorKey>, surface: Rc<dyn Surface>, root: WidgetId, children: Vec<Rc<dyn Element>>) -> Self {
        Self {
            core: ElementCore::new(key, surface, root),
            children,
        }
    }

    pub fn children(&self) -> &[Rc<dyn Element>] {
        &self.children
    }

    /// The first direct child carrying `key`.
    pub fn child(&self, key: &str) -> Option<&Rc<dyn Element>> {
        self.children.iter().find(|child| child.has_key(key))
    }

    fn for_each_element(&self, keys: &[&str], matched: impl Fn(&dyn Element), unmatched: impl Fn(&dyn Element)) {
        for child in &self.children {
            if keys.iter().any(|key| child.has_key(key)) {
                matched(child.as_ref());
            } else {
                unmatched(child.as_ref());
            }
        }
    }

    pub fn show(&self, key: &str) {
        self.show_keys(&[key]);
    }

    pub fn hide(&self, key: &str) {
        self.hide_keys(&[key]);
    }

    pub fn show_all(&self) {
        self.children.iter().for_each(|child| child.set_visible(true));
    }

    pub fn hide_all(&self) {
        self.children.iter().for_each(|child| child.set_visible(false));
    }

    pub fn show_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_visible(true), |_| {});
    }

    pub fn hide_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_visible(false), |_| {});
    }

    /// Shows the listed children and hides every other one.
    pub fn set_visible_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_visible(true), |child| child.set_visible(false));
    }

    pub fn enable_all(&self) {
        self.children.iter().for_each(|child| child.set_enabled(true));
    }

    pub fn disable_all(&self) {
        self.children.iter().for_each(|child| child.set_enabled(false));
    }

    pub fn enable_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_enabled(true), |_| {});
    }

    pub fn disable_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_enabled(false), |_| {});
    }

    /// Enables the listed children and disables every other one.
    pub fn set_enabled_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.set_enabled(true), |child| child.set_enabled(false));
    }

    pub fn reset_all(&self) {
        self.children.iter().for_each(|child| child.reset());
    }

    pub fn reset_keys(&self, keys: &[&str]) {
        self.for_each_element(keys, |child| child.reset(), |_| {});
    }
}

impl Element for ElementContainer {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn bound_error_keys(&self) -> BoundKeySet {
        self.children.iter().flat_map(|child| child.bound_error_keys()).collect()
    }

    fn display_errors(&self, all: &ErrorMap, unbound: &ErrorMap) {
        for child in &self.children {
            child.display_errors(all, unbound);
        }
    }

    fn reset(&self) {
        self.reset_all();
    }

    fn as_container(&self) -> Option<&ElementContainer> {
        Some(self)
    }

    fn apply_enabled(&self) {
        let effective = self.core.is_effectively_enabled();
        self.core.surface().set_enabled(self.core.root(), effective);
        for child in &self.children {
            child.set_parent_enabled(effective);
        }
    }
}

/// Weak handle to a built dialog's root container.
///
/// Given to the dialog state through [`crate::DialogState::bind`]. Every
/// operation is a no-op once the dialog is gone. Resetting and revalidating
/// are not offered: both borrow the state, which is already borrowed while
/// the state uses this handle.
#[derive(Clone, Default)]
pub struct DialogHandle {
    root: Weak<ElementContainer>,
}

impl DialogHandle {
    pub(crate) fn new(root: &Rc<ElementContainer>) -> Self {
        Self { root: Rc::downgrade(root) }
    }

    pub fn is_alive(&self) -> bool {
        self.root.strong_count() > 0
    }

    fn with_root(&self, apply: impl FnOnce(&ElementContainer)) {
        if let Some(root) = self.root.upgrade() {
            apply(&root);
        }
    }

    pub fn show(&self, key: &str) {
        self.with_root(|root| root.show(key));
    }

    pub fn hide(&self, key: &str) {
        self.with_root(|root| root.hide(key));
    }

    pub fn show_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.show_keys(keys));
    }

    pub fn hide_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.hide_keys(keys));
    }

    pub fn set_visible_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.set_visible_keys(keys));
    }

    pub fn enable_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.enable_keys(keys));
    }

    pub fn disable_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.disable_keys(keys));
    }

    pub fn set_enabled_keys(&self, keys: &[&str]) {
        self.with_root(|root| root.set_enabled_keys(keys));
    }

    /// Whether the direct child carrying `key` is currently enabled,
    /// ancestors included.
    pub fn is_enabled(&self, key: &str) -> Option<bool> {
        let root = self.root.upgrade()?;
        root.child(key).map(|child| child.is_effectively_enabled())
    }
}
