#![allow(dead_code)]

use std::rc::Rc;

use dialogkit_engine::scene::{SceneHost, SceneSurface, WidgetView};
use dialogkit_engine::{
    Dialog, DialogBuilder, DialogConfig, DialogHandle, DialogSchema, DialogState, Element, Host, MemberRegistry, SharedState, Tone, WidgetId, Window,
    shared,
};
use dialogkit_types::{ActionDescriptor, DelimitedList, ErrorMap, OptionDescriptor, ParsedText, Reference};

#[derive(Default)]
pub struct Sample {
    pub text: String,
    pub count: i64,
    pub matrix: String,
    pub tags: Vec<String>,
    pub port: u16,
    pub output: Option<Reference>,
    pub left: usize,
    pub middle: usize,
    pub right: usize,
    pub count_only: usize,
    pub validations: usize,
    pub destroyed: usize,
    pub handle: Option<DialogHandle>,
}

impl Sample {
    pub fn with_count(count: i64) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    fn left(&mut self) {
        self.left += 1;
    }

    fn middle(&mut self) {
        self.middle += 1;
    }

    fn right(&mut self) {
        self.right += 1;
    }

    fn count_only(&mut self) {
        self.count_only += 1;
    }
}

impl DialogState for Sample {
    fn update_and_validate(&mut self) -> ErrorMap {
        self.validations += 1;
        let mut errors = ErrorMap::new();
        if self.text.is_empty() {
            errors.insert("text", "Missing text");
        } else if self.text.starts_with('!') {
            errors.insert("special", "Text must not start with '!'");
        }
        if self.count <= 0 {
            errors.insert("count", "Count must be positive");
        }
        if !self.matrix.is_empty() && self.matrix.len() < 4 {
            errors.insert("matrix", "Matrix key is too short");
        }
        if let Some(handle) = &self.handle {
            if self.count > 100 {
                handle.hide("matrix");
            } else {
                handle.show("matrix");
            }
        }
        errors
    }

    fn on_destroy(&mut self) {
        self.destroyed += 1;
    }

    fn bind(&mut self, dialog: DialogHandle) {
        self.handle = Some(dialog);
    }
}

impl DialogSchema for Sample {
    fn describe(members: &mut MemberRegistry<Self>) {
        members
            .option("text", OptionDescriptor::new("Some Text"), |state| &mut state.text)
            .option("count", OptionDescriptor::new("Count"), |state| &mut state.count)
            .option("matrix", OptionDescriptor::new("Matrix").secret(), |state| &mut state.matrix)
            .mapped_option("tags", OptionDescriptor::new("Tags"), DelimitedList::default(), |state| &mut state.tags)
            .mapped_option("port", OptionDescriptor::new("Port"), ParsedText::<u16>::new(), |state| &mut state.port)
            .option("output", OptionDescriptor::new("Output").hide_errors(), |state| &mut state.output)
            .action("left", ActionDescriptor::new("Left"), Sample::left)
            .action("middle", ActionDescriptor::new("Middle").unvalidated(), Sample::middle)
            .action("right", ActionDescriptor::new("Right").scoped(["text"]), Sample::right)
            .action("count_only", ActionDescriptor::new("Count Only").scoped(["count"]), Sample::count_only);
    }
}

pub struct Harness {
    pub host: Rc<SceneHost>,
    pub state: SharedState<Sample>,
    pub window: Window<Sample>,
}

impl Harness {
    pub fn open(sample: Sample) -> Self {
        Self::open_with(sample, DialogConfig::default())
    }

    pub fn open_with(sample: Sample, config: DialogConfig) -> Self {
        let host = SceneHost::new();
        let state = shared(sample);
        let window = DialogBuilder::<Sample>::new()
            .build_window("Sample", host.clone() as Rc<dyn Host>, Rc::new(config), Rc::clone(&state))
            .expect("sample dialog builds");
        Self { host, state, window }
    }

    pub fn dialog(&self) -> &Dialog<Sample> {
        self.window.dialog()
    }

    pub fn main(&self) -> Rc<SceneSurface> {
        self.host.surfaces().into_iter().next().expect("main surface is alive")
    }

    pub fn editor(&self, label: &str) -> WidgetId {
        self.main().find_editor(label).unwrap_or_else(|| panic!("editor `{label}` exists"))
    }

    pub fn button(&self, label: &str) -> WidgetId {
        self.main().find_button(label).unwrap_or_else(|| panic!("button `{label}` exists"))
    }

    pub fn button_enabled(&self, label: &str) -> bool {
        self.main().is_enabled(self.button(label))
    }

    /// Inline error text of the option keyed `key`.
    pub fn inline_error(&self, key: &str) -> Option<String> {
        let slot = self.dialog().root().child(key)?.root();
        error_text_under(&self.main(), slot)
    }

    /// Text of the dialog's unbound error display.
    pub fn unbound_display(&self) -> String {
        error_text_under(&self.main(), self.dialog().root().root()).expect("error display exists")
    }

    pub fn snapshot(&self) -> Vec<String> {
        let surface = self.main();
        surface.widgets().into_iter().filter_map(|id| surface.widget(id)).map(|widget| format!("{widget:?}")).collect()
    }
}

/// The first error-toned text among the direct children of `parent`.
pub fn error_text_under(surface: &SceneSurface, parent: WidgetId) -> Option<String> {
    surface.children(parent).into_iter().find_map(|id| {
        let widget = surface.widget(id)?;
        match widget.view {
            WidgetView::Text(content) if widget.style.tone == Tone::Error => Some(content),
            _ => None,
        }
    })
}
