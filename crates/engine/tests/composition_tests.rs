mod support;

use std::rc::Rc;

use dialogkit_engine::scene::SceneHost;
use dialogkit_engine::{
    DialogBuilder, DialogConfig, DialogSchema, DialogState, Element, EntryDefinition, ErrorDisplayDefinition, ErrorDisplayElement, Host,
    LineDefinition, MemberRegistry, OnChange, SharedState, Surface, SurfaceKind, UiBuilder, discover, shared,
};
use dialogkit_types::{ActionDescriptor, ErrorKey, ErrorMap, OptionDescriptor, SchemaError};
use support::{Sample, error_text_under};

fn grouped_builder() -> DialogBuilder<Sample> {
    let members = discover::<Sample>().expect("sample members");
    let text = members.option("text").cloned().expect("text option");
    let middle = members.action("middle").cloned().expect("middle action");
    let inner = LineDefinition::new(Vec::new()).keyed("inner").push(middle);
    let group = LineDefinition::new(Vec::new()).keyed("group").push(text).push(inner);
    DialogBuilder::empty().add_entry(group).add_entry(ErrorDisplayDefinition::all())
}

fn open(builder: &DialogBuilder<Sample>, sample: Sample) -> (Rc<SceneHost>, Result<dialogkit_engine::Window<Sample>, SchemaError>, SharedState<Sample>) {
    let host = SceneHost::new();
    let state = shared(sample);
    let window = builder.build_window("Composed", host.clone() as Rc<dyn Host>, Rc::new(DialogConfig::default()), Rc::clone(&state));
    (host, window, state)
}

#[test]
fn discovery_preserves_declaration_order() {
    let members = discover::<Sample>().expect("sample members");
    let options: Vec<&str> = members.option_idents().into_iter().map(ErrorKey::as_str).collect();
    let actions: Vec<&str> = members.action_idents().into_iter().map(ErrorKey::as_str).collect();

    assert_eq!(options, ["text", "count", "matrix", "tags", "port", "output"]);
    assert_eq!(actions, ["left", "middle", "right", "count_only"]);

    let again = discover::<Sample>().expect("cached members");
    assert_eq!(again.option_idents().len(), options.len());
}

#[test]
fn default_layout_is_options_then_unbound_errors_then_actions() {
    let (_host, window, _state) = open(&DialogBuilder::<Sample>::new(), Sample::with_count(5));
    let window = window.expect("window");
    let root = window.dialog().root();

    let keys: Vec<Option<&str>> = root.children().iter().map(|child| child.key().map(ErrorKey::as_str)).collect();
    assert_eq!(
        keys,
        [Some("text"), Some("count"), Some("matrix"), Some("tags"), Some("port"), Some("output"), None, None]
    );

    let line = root.children().last().and_then(|child| child.as_container()).expect("action line");
    let actions: Vec<Option<&str>> = line.children().iter().map(|child| child.key().map(ErrorKey::as_str)).collect();
    assert_eq!(actions, [Some("left"), Some("middle"), Some("right"), Some("count_only")]);
}

#[test]
fn disabling_a_container_disables_every_descendant() {
    let (host, window, _state) = open(&grouped_builder(), Sample::with_count(5));
    let window = window.expect("window");
    let root = window.dialog().root();
    let surface = host.top().expect("surface");

    let group = root.child("group").and_then(|group| group.as_container()).expect("group line");
    let inner = group.child("inner").and_then(|inner| inner.as_container()).expect("inner line");
    let middle = inner.child("middle").expect("middle action");
    assert!(middle.is_effectively_enabled());

    root.disable_keys(&["group"]);
    assert!(middle.enabled(), "own flag is untouched");
    assert!(!middle.parent_enabled());
    assert!(!middle.is_effectively_enabled());
    assert!(!surface.widget(middle.root()).expect("button").enabled);
    assert!(!surface.is_enabled(surface.find_editor("Some Text").expect("text editor")));
    assert!(!surface.press(surface.find_button("Middle").expect("middle button")));

    root.enable_all();
    assert!(middle.is_effectively_enabled());
    assert!(surface.widget(middle.root()).expect("button").enabled);

    group.disable_keys(&["inner"]);
    root.disable_keys(&["group"]);
    root.enable_keys(&["group"]);
    assert!(!middle.is_effectively_enabled(), "inner line keeps its own flag");
}

#[test]
fn visibility_is_a_pass_through_to_the_widget() {
    let (host, window, _state) = open(&grouped_builder(), Sample::with_count(5));
    let window = window.expect("window");
    let root = window.dialog().root();
    let surface = host.top().expect("surface");
    let group = root.child("group").and_then(|group| group.as_container()).expect("group line");
    let inner = group.child("inner").expect("inner line");
    let button = surface.find_button("Middle").expect("middle button");

    root.hide("group");
    assert!(!surface.is_shown(button));
    assert!(inner.visible());
    assert!(!surface.press(button));

    root.set_visible_keys(&["group"]);
    assert!(surface.is_shown(button));
    let display = root.children().last().expect("error display");
    assert!(!display.visible());

    root.show_all();
    assert!(display.visible());
}

#[test]
fn full_error_display_lists_every_error() {
    let (host, window, _state) = open(&grouped_builder(), Sample::default());
    let window = window.expect("window");
    let surface = host.top().expect("surface");

    let shown = error_text_under(&surface, window.dialog().root().root()).expect("display text");
    assert_eq!(shown, "Missing text\nCount must be positive");
}

struct Leaky {
    pop_layout: bool,
}

impl EntryDefinition<Sample> for Leaky {
    fn label(&self) -> String {
        "leaky".to_string()
    }

    fn create(&self, ui: &mut UiBuilder, _dialog: &SharedState<Sample>, _on_change: &OnChange, _in_private: bool) -> Result<Rc<dyn Element>, SchemaError> {
        ui.vertical(1.0);
        ui.push_style(ui.style().clone());
        let text = ui.text("");
        if self.pop_layout {
            ui.nest_out();
        }
        Ok(Rc::new(ErrorDisplayElement::new(Rc::clone(ui.surface()), text, true)))
    }
}

#[test]
fn unbalanced_definitions_abort_the_build() {
    let (host, window, state) = open(&DialogBuilder::empty().add_entry(Leaky { pop_layout: false }), Sample::with_count(5));

    match window {
        Err(SchemaError::UnbalancedBuilder { entry, expected, found, .. }) => {
            assert_eq!(entry, "leaky");
            assert_eq!(found, expected + 1);
        }
        other => panic!("expected an unbalanced builder error, got {:?}", other.err()),
    }
    assert!(host.is_idle(), "a failed build leaves no surface behind");
    assert_eq!(state.borrow().destroyed, 1);

    let (_host, window, _state) = open(&DialogBuilder::empty().add_entry(Leaky { pop_layout: true }), Sample::with_count(5));
    assert!(matches!(window.err(), Some(SchemaError::UnbalancedBuilder { expected_style, found_style, .. }) if found_style == expected_style + 1));
}

#[derive(Default)]
struct Malformed {
    value: String,
}

impl DialogState for Malformed {
    fn update_and_validate(&mut self) -> ErrorMap {
        ErrorMap::new()
    }

    fn on_destroy(&mut self) {}
}

impl DialogSchema for Malformed {
    fn describe(members: &mut MemberRegistry<Self>) {
        members
            .option("value", OptionDescriptor::new("Value"), |state| &mut state.value)
            .option("value", OptionDescriptor::new("Again"), |state| &mut state.value);
    }
}

#[derive(Default)]
struct Unnamed;

impl DialogState for Unnamed {
    fn update_and_validate(&mut self) -> ErrorMap {
        ErrorMap::new()
    }

    fn on_destroy(&mut self) {}
}

impl DialogSchema for Unnamed {
    fn describe(members: &mut MemberRegistry<Self>) {
        members.action("go", ActionDescriptor::new("  "), |_state| {});
    }
}

#[derive(Default)]
struct EmptyScope;

impl DialogState for EmptyScope {
    fn update_and_validate(&mut self) -> ErrorMap {
        ErrorMap::new()
    }

    fn on_destroy(&mut self) {}
}

impl DialogSchema for EmptyScope {
    fn describe(members: &mut MemberRegistry<Self>) {
        members.action("go", ActionDescriptor::new("Go").scoped(Vec::<ErrorKey>::new()), |_state| {});
    }
}

#[test]
fn malformed_metadata_fails_discovery() {
    assert_eq!(
        discover::<Malformed>().err(),
        Some(SchemaError::DuplicateMember { member: "value".to_string() })
    );
    assert_eq!(discover::<Unnamed>().err(), Some(SchemaError::EmptyName { member: "go".to_string() }));
    assert_eq!(
        discover::<EmptyScope>().err(),
        Some(SchemaError::EmptyValidationScope { action: "go".to_string() })
    );
}

#[test]
fn malformed_schema_never_shows_a_window() {
    let host = SceneHost::new();
    let result = DialogBuilder::<Malformed>::new().build_window(
        "Malformed",
        host.clone() as Rc<dyn Host>,
        Rc::new(DialogConfig::default()),
        shared(Malformed::default()),
    );
    assert!(result.is_err());
    assert!(host.is_idle());
}

#[test]
fn building_into_a_destroyed_surface_fails() {
    let host = SceneHost::new();
    let surface = host.open_surface("gone", SurfaceKind::Dialog, DialogConfig::default().dialog_canvas);
    surface.destroy();

    let mut ui = UiBuilder::new(surface, host.clone() as Rc<dyn Host>, Rc::new(DialogConfig::default()));
    let result = grouped_builder().build_in_place(&mut ui, shared(Sample::default()), false);
    assert!(matches!(result.err(), Some(SchemaError::SurfaceDestroyed { title }) if title == "gone"));
}
