//! Tab order over the interactive widgets of the top-most surface.
//!
//! One `FocusFlag` is kept per widget for as long as the surface lives, so a
//! rebuilt ring keeps whatever was focused. The scene's own focused widget is
//! authoritative: the engine moves it (a popup focusing its editor) and the
//! ring follows, and every Tab is written back to the scene.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use dialogkit_engine::{Surface, WidgetId};
use dialogkit_engine::scene::{SceneSurface, WidgetView};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

// Leaf wrapper registering one widget flag with the builder
struct PanelLeaf(FocusFlag);

impl HasFocus for PanelLeaf {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.0.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[derive(Default)]
pub struct FocusRing {
    surface: Weak<SceneSurface>,
    flags: HashMap<WidgetId, FocusFlag>,
    order: Vec<WidgetId>,
    focus: Focus,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widgets that take focus: shown, enabled buttons and editors.
    pub fn focusable(surface: &SceneSurface) -> Vec<WidgetId> {
        surface
            .widgets()
            .into_iter()
            .filter(|id| {
                surface.is_interactive(*id)
                    && surface
                        .widget(*id)
                        .is_some_and(|widget| matches!(widget.view, WidgetView::Button(_) | WidgetView::Editor { .. }))
            })
            .collect()
    }

    pub fn order(&self) -> &[WidgetId] {
        &self.order
    }

    /// Rebuilds the ring for `surface` and reconciles it with the scene's
    /// focused widget. Returns the focused widget, if any.
    pub fn sync(&mut self, surface: &Rc<SceneSurface>) -> Option<WidgetId> {
        if !self.surface.upgrade().is_some_and(|current| Rc::ptr_eq(&current, surface)) {
            self.surface = Rc::downgrade(surface);
            self.flags.clear();
        }

        self.order = Self::focusable(surface);
        self.flags.retain(|id, _| self.order.contains(id));
        let mut builder = FocusBuilder::new(None);
        for id in &self.order {
            let flag = self
                .flags
                .entry(*id)
                .or_insert_with(|| FocusFlag::new().with_name(&format!("dialog.widget.{}", id.index())));
            builder.widget(&PanelLeaf(flag.clone()));
        }
        self.focus = builder.build();

        let target = surface
            .focused()
            .filter(|id| self.order.contains(id))
            .or_else(|| self.current())
            .or_else(|| self.order.first().copied());
        if let Some(target) = target {
            self.focus_widget(surface, target);
        }
        target
    }

    /// The widget whose flag is set.
    pub fn current(&self) -> Option<WidgetId> {
        self.order.iter().copied().find(|id| self.flags.get(id).is_some_and(FocusFlag::get))
    }

    pub fn focus_widget(&self, surface: &SceneSurface, id: WidgetId) {
        if let Some(flag) = self.flags.get(&id) {
            if !flag.get() {
                self.focus.focus(flag);
            }
            surface.focus(id);
        }
    }

    pub fn next(&self, surface: &SceneSurface) -> Option<WidgetId> {
        self.focus.next();
        self.write_back(surface)
    }

    pub fn prev(&self, surface: &SceneSurface) -> Option<WidgetId> {
        self.focus.prev();
        self.write_back(surface)
    }

    fn write_back(&self, surface: &SceneSurface) -> Option<WidgetId> {
        let current = self.current()?;
        surface.focus(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use dialogkit_engine::{CanvasSize, SurfaceKind, WidgetStyle};

    use super::*;

    fn surface_with_buttons() -> (Rc<SceneSurface>, Vec<WidgetId>) {
        let surface = Rc::new(SceneSurface::new("focus", SurfaceKind::Dialog, CanvasSize::new(10.0, 10.0)));
        let style = WidgetStyle::default();
        let ids = ["One", "Two", "Three"]
            .into_iter()
            .map(|label| surface.add_button(surface.root(), label, &style, Rc::new(|| {})))
            .collect();
        (surface, ids)
    }

    #[test]
    fn tab_cycles_through_interactive_widgets() {
        let (surface, ids) = surface_with_buttons();
        surface.set_enabled(ids[1], false);
        let mut ring = FocusRing::new();

        assert_eq!(ring.sync(&surface), Some(ids[0]));
        assert_eq!(ring.order(), [ids[0], ids[2]]);
        assert_eq!(ring.next(&surface), Some(ids[2]));
        assert_eq!(surface.focused(), Some(ids[2]));
        assert_eq!(ring.next(&surface), Some(ids[0]));
        assert_eq!(ring.prev(&surface), Some(ids[2]));
    }

    #[test]
    fn ring_follows_focus_moved_by_the_scene() {
        let (surface, ids) = surface_with_buttons();
        let mut ring = FocusRing::new();
        ring.sync(&surface);

        surface.focus(ids[1]);
        assert_eq!(ring.sync(&surface), Some(ids[1]));
        assert_eq!(ring.current(), Some(ids[1]));
    }

    #[test]
    fn focus_moves_off_widgets_that_become_hidden() {
        let (surface, ids) = surface_with_buttons();
        let mut ring = FocusRing::new();
        ring.sync(&surface);
        ring.next(&surface);

        surface.set_active(ids[1], false);
        assert_eq!(ring.sync(&surface), Some(ids[0]));
    }
}
