mod support;

use dialogkit_engine::scene::WidgetView;
use dialogkit_engine::{Alignment, Element, Tone};
use dialogkit_types::{BoundKeySet, ErrorKey};
use serde_json::json;
use support::{Harness, Sample};

#[test]
fn scoped_action_ignores_unrelated_errors() {
    let harness = Harness::open(Sample::with_count(5));

    let report = harness.dialog().revalidate();
    assert_eq!(report.all.len(), 1, "errors: {:?}", report.all);
    assert_eq!(report.all.get("text"), Some("Missing text"));

    assert!(harness.button_enabled("Count Only"));
    assert!(harness.button_enabled("Middle"));
    assert!(!harness.button_enabled("Left"));
    assert!(!harness.button_enabled("Right"));
}

#[test]
fn editing_a_field_revalidates_and_updates_elements() {
    let harness = Harness::open(Sample::with_count(5));
    assert_eq!(harness.inline_error("text").as_deref(), Some("Missing text"));

    assert!(harness.main().commit(harness.editor("Some Text"), json!("hello")));

    assert_eq!(harness.state.borrow().text, "hello");
    assert_eq!(harness.inline_error("text").as_deref(), Some(""));
    assert!(harness.button_enabled("Left"));
    assert!(harness.button_enabled("Right"));

    assert!(harness.main().press(harness.button("Left")));
    assert_eq!(harness.state.borrow().left, 1);
}

#[test]
fn consecutive_passes_produce_identical_widgets() {
    let harness = Harness::open(Sample::with_count(0));
    harness.dialog().revalidate();
    let first = harness.snapshot();
    harness.dialog().revalidate();
    assert_eq!(harness.snapshot(), first);
}

#[test]
fn bound_keys_are_the_union_of_element_claims() {
    let harness = Harness::open(Sample::default());
    let dialog = harness.dialog();

    let union: BoundKeySet = dialog.root().children().iter().flat_map(|child| child.bound_error_keys()).collect();
    assert_eq!(dialog.bound_keys(), &union);

    let expected: BoundKeySet = ["text", "count", "matrix", "tags", "port"].into_iter().map(ErrorKey::from).collect();
    assert_eq!(dialog.bound_keys(), &expected);
}

#[test]
fn unbound_display_shows_exactly_the_unclaimed_errors() {
    let harness = Harness::open(Sample::with_count(0));
    harness.main().commit(harness.editor("Some Text"), json!("!bang"));

    let report = harness.dialog().revalidate();
    assert_eq!(report.unbound.len(), 1);
    assert_eq!(harness.unbound_display(), "Text must not start with '!'");
    assert_eq!(harness.inline_error("count").as_deref(), Some("Count must be positive"));
    assert!(!harness.unbound_display().contains("Count"));
}

#[test]
fn hidden_error_slot_leaves_errors_unbound() {
    let harness = Harness::open(Sample::with_count(5));
    assert!(!harness.dialog().bound_keys().contains("output"));
    assert!(harness.inline_error("output").is_none());
}

#[test]
fn failed_unmap_drops_the_edit_without_a_pass() {
    let harness = Harness::open(Sample {
        port: 8080,
        ..Sample::with_count(5)
    });
    let validations = harness.state.borrow().validations;

    harness.main().commit(harness.editor("Port"), json!("not a port"));
    assert_eq!(harness.state.borrow().port, 8080);
    assert_eq!(harness.state.borrow().validations, validations);

    harness.main().commit(harness.editor("Port"), json!(" 9090 "));
    assert_eq!(harness.state.borrow().port, 9090);
    assert_eq!(harness.state.borrow().validations, validations + 1);
}

#[test]
fn mapped_list_is_edited_as_delimited_text() {
    let harness = Harness::open(Sample {
        tags: vec!["red".to_string(), "blue".to_string()],
        ..Sample::with_count(5)
    });
    let editor = harness.editor("Tags");
    assert_eq!(harness.main().value_of(editor), Some(json!("red, blue")));

    harness.main().commit(editor, json!("a,, b "));
    assert_eq!(harness.state.borrow().tags, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn reset_rereads_fields_into_editors() {
    let harness = Harness::open(Sample::with_count(5));
    harness.state.borrow_mut().text = "external".to_string();

    harness.dialog().root().reset_keys(&["text"]);
    assert_eq!(harness.main().value_of(harness.editor("Some Text")), Some(json!("external")));
}

#[test]
fn validation_can_toggle_sections_through_the_bound_handle() {
    let harness = Harness::open(Sample::with_count(5));
    let matrix = harness.dialog().root().child("matrix").expect("matrix element").root();
    assert!(harness.main().is_shown(matrix));

    harness.main().commit(harness.editor("Count"), json!(500));
    assert!(!harness.main().is_shown(matrix));

    harness.main().commit(harness.editor("Count"), json!(5));
    assert!(harness.main().is_shown(matrix));
}

#[test]
fn on_destroy_runs_once_when_closed_twice() {
    let harness = Harness::open(Sample::with_count(5));
    harness.window.close();
    harness.window.close();
    harness.host.run_pending();
    harness.window.destroy();

    assert!(!harness.window.is_open());
    assert_eq!(harness.state.borrow().destroyed, 1);
    assert!(harness.host.is_idle());
}

#[test]
fn error_texts_are_right_aligned() {
    let harness = Harness::open(Sample::with_count(5));
    let surface = harness.main();
    let errors: Vec<_> = surface
        .widgets()
        .into_iter()
        .filter_map(|id| surface.widget(id))
        .filter(|widget| matches!(widget.view, WidgetView::Text(_)) && widget.style.tone == Tone::Error)
        .collect();

    assert!(!errors.is_empty());
    assert!(errors.iter().all(|widget| widget.style.alignment == Alignment::Right));
}
