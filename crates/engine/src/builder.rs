//! Composing definitions into dialogs and windows.
//!
//! A [`DialogBuilder`] made with [`DialogBuilder::new`] starts from the
//! discovered members of the state type: every option in declaration order,
//! an error display for unbound errors, then one line holding every action.
//! Entries added with [`DialogBuilder::add_entry`] follow the defaults.

use std::rc::Rc;

use dialogkit_types::{ErrorMap, SchemaError};
use tracing::{debug, info};

use crate::config::DialogConfig;
use crate::container::{DialogHandle, ElementContainer};
use crate::definition::{EntryDefinition, EntryRef, ErrorDisplayDefinition, LineDefinition, create_checked};
use crate::dialog::{Dialog, DialogCore};
use crate::discovery::{DialogSchema, Members, discover};
use crate::element::Element;
use crate::reconcile::{LateBinding, state_validation};
use crate::state::{DialogState, SharedState, ValidationSource};
use crate::toolkit::{Host, Surface, SurfaceKind, WidgetId};
use crate::ui_builder::UiBuilder;

type Defaults<S> = fn() -> Result<Members<S>, SchemaError>;

pub struct DialogBuilder<S: DialogState> {
    defaults: Option<Defaults<S>>,
    entries: Vec<EntryRef<S>>,
    validation: Option<ValidationSource<S>>,
}

impl<S: DialogSchema> DialogBuilder<S> {
    /// A builder seeded with the discovered members of `S`.
    pub fn new() -> Self {
        Self {
            defaults: Some(discover::<S>),
            entries: Vec::new(),
            validation: None,
        }
    }
}

impl<S: DialogSchema> Default for DialogBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DialogState> DialogBuilder<S> {
    /// A builder without default entries.
    pub fn empty() -> Self {
        Self {
            defaults: None,
            entries: Vec::new(),
            validation: None,
        }
    }

    /// Replaces [`DialogState::update_and_validate`] as the source of each
    /// pass's error map.
    pub fn with_validation_source(mut self, source: impl Fn(&SharedState<S>) -> ErrorMap + 'static) -> Self {
        self.validation = Some(Rc::new(source));
        self
    }

    pub fn add_entry(self, entry: impl EntryDefinition<S> + 'static) -> Self {
        self.add_shared_entry(Rc::new(entry))
    }

    pub fn add_shared_entry(mut self, entry: EntryRef<S>) -> Self {
        self.entries.push(entry);
        self
    }

    /// The full list of top-level definitions, defaults first.
    pub fn definitions(&self) -> Result<Vec<EntryRef<S>>, SchemaError> {
        let mut definitions: Vec<EntryRef<S>> = Vec::new();
        if let Some(defaults) = self.defaults {
            let members = defaults()?;
            for option in members.options() {
                definitions.push(Rc::new(option.clone()));
            }
            definitions.push(Rc::new(ErrorDisplayDefinition::unbound()));
            let actions = members.actions().iter().map(|action| Rc::new(action.clone()) as EntryRef<S>).collect();
            definitions.push(Rc::new(LineDefinition::new(actions)));
        }
        definitions.extend(self.entries.iter().cloned());
        Ok(definitions)
    }

    /// Builds the dialog under the cursor's current parent, binds the state
    /// and runs the initial pass.
    ///
    /// Dialogs built for a private surface edit state owned by another
    /// dialog, so the state keeps the handle of its owner.
    pub fn build_in_place(&self, ui: &mut UiBuilder, state: SharedState<S>, in_private: bool) -> Result<Dialog<S>, SchemaError> {
        if ui.surface().is_destroyed() {
            return Err(SchemaError::SurfaceDestroyed { title: ui.surface().title() });
        }
        let definitions = self.definitions()?;
        let binding = LateBinding::new();
        let on_change = binding.on_change();

        let spacing = ui.config().spacing;
        let root_widget = ui.vertical(spacing);
        let mut children = Vec::with_capacity(definitions.len());
        for definition in &definitions {
            match create_checked(definition.as_ref(), ui, &state, &on_change, in_private) {
                Ok(child) => children.push(child),
                Err(error) => {
                    ui.nest_out();
                    return Err(error);
                }
            }
        }
        ui.nest_out();

        let root = Rc::new(ElementContainer::new(None, Rc::clone(ui.surface()), root_widget, children));
        let core = Rc::new(DialogCore {
            state: Rc::clone(&state),
            bound: root.bound_error_keys(),
            root,
            validation: self.validation.clone().unwrap_or_else(state_validation::<S>),
            surface: Rc::clone(ui.surface()),
            host: Rc::clone(ui.host()),
        });
        binding.attach(&core);
        if !in_private {
            state.borrow_mut().bind(DialogHandle::new(&core.root));
        }

        let dialog = Dialog::new(core);
        let report = dialog.revalidate();
        debug!(bound = dialog.bound_keys().len(), errors = report.all.len(), in_private, "built dialog");
        Ok(dialog)
    }

    /// Opens a dialog surface on `host` and builds into it.
    ///
    /// The state's [`DialogState::on_destroy`] runs exactly once, when the
    /// surface begins tear-down. A failed build destroys the surface before
    /// the error is returned.
    pub fn build_window(&self, title: &str, host: Rc<dyn Host>, config: Rc<DialogConfig>, state: SharedState<S>) -> Result<Window<S>, SchemaError> {
        self.open_window(title, host, config, state, SurfaceKind::Dialog)
    }

    pub(crate) fn open_window(
        &self,
        title: &str,
        host: Rc<dyn Host>,
        config: Rc<DialogConfig>,
        state: SharedState<S>,
        kind: SurfaceKind,
    ) -> Result<Window<S>, SchemaError> {
        let in_private = kind == SurfaceKind::Private;
        let size = if in_private { config.popup_canvas } else { config.dialog_canvas };
        let surface = host.open_surface(title, kind, size);
        if !in_private {
            notify_destroy(surface.as_ref(), Rc::clone(&state), Rc::clone(&host));
        }

        let mut ui = UiBuilder::new(Rc::clone(&surface), host, config);
        ui.scroll_area();
        let built = self.build_in_place(&mut ui, state, in_private);
        ui.nest_out();

        match built {
            Ok(dialog) => {
                info!(title, private = in_private, "opened dialog window");
                Ok(Window {
                    dialog,
                    first_editor: ui.first_editor(),
                })
            }
            Err(error) => {
                surface.destroy();
                Err(error)
            }
        }
    }
}

fn notify_destroy<S: DialogState>(surface: &dyn Surface, state: SharedState<S>, host: Rc<dyn Host>) {
    surface.on_teardown(Box::new(move || match state.try_borrow_mut() {
        Ok(mut state) => state.on_destroy(),
        Err(_) => {
            let state = Rc::clone(&state);
            host.run_synchronously(Box::new(move || state.borrow_mut().on_destroy()));
        }
    }));
}

/// A dialog that owns its surface.
pub struct Window<S: DialogState> {
    dialog: Dialog<S>,
    first_editor: Option<WidgetId>,
}

impl<S: DialogState> Window<S> {
    pub fn dialog(&self) -> &Dialog<S> {
        &self.dialog
    }

    pub fn surface(&self) -> &Rc<dyn Surface> {
        self.dialog.surface()
    }

    pub fn is_open(&self) -> bool {
        !self.surface().is_destroyed()
    }

    pub fn first_editor(&self) -> Option<WidgetId> {
        self.first_editor
    }

    pub fn focus_first_editor(&self) {
        if let Some(editor) = self.first_editor {
            self.surface().focus(editor);
        }
    }

    /// Destroys the surface on the owning context.
    pub fn close(&self) {
        self.dialog.close();
    }

    /// Destroys the surface immediately.
    pub fn destroy(&self) {
        self.surface().destroy();
    }
}
