//! Terminal-side state over a scene host and the key routing into it.
//!
//! The app never touches dialog state. Keys become edits and presses on the
//! top-most scene surface, which in turn drive the engine's handlers exactly
//! like a graphical toolkit would. Deferred engine work is drained after
//! every event, then focus is reconciled with whatever the event changed.

use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dialogkit_engine::{Surface, WidgetId};
use dialogkit_engine::scene::{SceneHost, SceneSurface, WidgetView};
use dialogkit_types::{EditorKind, ValueKind};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::ui::edit_buffer::EditBuffer;
use crate::ui::focus::FocusRing;

pub struct App {
    host: Rc<SceneHost>,
    pub focus: FocusRing,
    /// Text being typed into the focused editor.
    buffer: Option<(WidgetId, EditBuffer)>,
    pub dirty: bool,
}

impl App {
    pub fn new(host: Rc<SceneHost>) -> Self {
        let mut app = Self {
            host,
            focus: FocusRing::new(),
            buffer: None,
            dirty: true,
        };
        app.settle();
        app
    }

    pub fn host(&self) -> &Rc<SceneHost> {
        &self.host
    }

    /// The surface receiving input.
    pub fn top(&self) -> Option<Rc<SceneSurface>> {
        self.host.top()
    }

    pub fn should_exit(&self) -> bool {
        self.host.is_idle() && !self.host.has_pending()
    }

    /// Buffer contents for `id` when it is the editor being typed into.
    pub fn buffer_for(&self, id: WidgetId) -> Option<&EditBuffer> {
        self.buffer.as_ref().filter(|(owner, _)| *owner == id).map(|(_, buffer)| buffer)
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.current()
    }

    /// Runs deferred engine work and reconciles focus and the edit buffer.
    pub fn settle(&mut self) {
        self.host.run_pending();
        let Some(surface) = self.top() else {
            self.buffer = None;
            return;
        };
        let focused = self.focus.sync(&surface);
        self.refresh_buffer(&surface, focused);
        self.dirty = true;
    }

    fn refresh_buffer(&mut self, surface: &SceneSurface, focused: Option<WidgetId>) {
        let keep = matches!((&self.buffer, focused), (Some((owner, _)), Some(id)) if *owner == id);
        if keep {
            return;
        }
        self.buffer = focused.and_then(|id| match surface.widget(id)?.view {
            WidgetView::Editor { kind, value, .. } if kind != EditorKind::Value(ValueKind::Boolean) => Some((id, EditBuffer::from_value(&value))),
            _ => None,
        });
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Resize(..) => self.dirty = true,
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            info!("closing every surface");
            self.host.close_all();
            self.settle();
            return;
        }
        let Some(surface) = self.top() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                info!(title = %surface.title(), "closing top surface");
                surface.destroy();
            }
            KeyCode::Tab => {
                self.focus.next(&surface);
            }
            KeyCode::BackTab => {
                self.focus.prev(&surface);
            }
            code => self.route_to_focused(&surface, code),
        }
        self.settle();
    }

    fn route_to_focused(&mut self, surface: &SceneSurface, code: KeyCode) {
        let Some(id) = self.focused() else {
            return;
        };
        let Some(widget) = surface.widget(id) else {
            return;
        };
        match widget.view {
            WidgetView::Button(label) => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    debug!(%label, "pressing button");
                    surface.press(id);
                }
            }
            WidgetView::Editor {
                kind: EditorKind::Value(ValueKind::Boolean),
                value,
                ..
            } => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let toggled = !value.as_bool().unwrap_or(false);
                    surface.commit(id, JsonValue::Bool(toggled));
                }
            }
            WidgetView::Editor { kind, .. } => self.edit(surface, id, kind, code),
            WidgetView::Layout(_) | WidgetView::Text(_) => {}
        }
    }

    fn edit(&mut self, surface: &SceneSurface, id: WidgetId, kind: EditorKind, code: KeyCode) {
        let Some((_, buffer)) = self.buffer.as_mut().filter(|(owner, _)| *owner == id) else {
            return;
        };
        let changed = match code {
            KeyCode::Char(c) => {
                buffer.insert_char(c);
                true
            }
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Delete => buffer.delete(),
            KeyCode::Left => {
                buffer.move_left();
                false
            }
            KeyCode::Right => {
                buffer.move_right();
                false
            }
            KeyCode::Home => {
                buffer.move_home();
                false
            }
            KeyCode::End => {
                buffer.move_end();
                false
            }
            KeyCode::Enter => {
                self.focus.next(surface);
                false
            }
            _ => false,
        };
        if !changed {
            return;
        }
        match buffer.to_value(kind) {
            Some(value) => {
                surface.commit(id, value);
            }
            None => debug!(widget = %id, "holding input that does not parse yet"),
        }
    }
}
