use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dialogkit_engine::scene::SceneHost;
use dialogkit_engine::{DialogBuilder, DialogConfig, DialogSchema, DialogState, Host, MemberRegistry, SharedState, Window, shared};
use dialogkit_tui::App;
use dialogkit_tui::ui::runtime::draw_frame;
use dialogkit_types::{ActionDescriptor, ErrorMap, OptionDescriptor};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

#[derive(Default)]
struct Login {
    user: String,
    pin: i64,
    secret: String,
    remember: bool,
    submitted: usize,
    destroyed: usize,
}

impl DialogState for Login {
    fn update_and_validate(&mut self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        if self.user.is_empty() {
            errors.insert("user", "Missing user");
        }
        if self.pin <= 0 {
            errors.insert("pin", "PIN must be positive");
        }
        errors
    }

    fn on_destroy(&mut self) {
        self.destroyed += 1;
    }
}

impl DialogSchema for Login {
    fn describe(members: &mut MemberRegistry<Self>) {
        members
            .option("user", OptionDescriptor::new("User"), |state| &mut state.user)
            .option("pin", OptionDescriptor::new("PIN"), |state| &mut state.pin)
            .option("secret", OptionDescriptor::new("Secret").secret(), |state| &mut state.secret)
            .option("remember", OptionDescriptor::new("Remember"), |state| &mut state.remember)
            .action("submit", ActionDescriptor::new("Submit"), |state| state.submitted += 1);
    }
}

struct Session {
    host: Rc<SceneHost>,
    state: SharedState<Login>,
    _window: Window<Login>,
    app: App,
}

impl Session {
    fn open() -> Self {
        let host = SceneHost::new();
        let state = shared(Login::default());
        let window = DialogBuilder::<Login>::new()
            .build_window("Login", host.clone() as Rc<dyn Host>, Rc::new(DialogConfig::default()), Rc::clone(&state))
            .expect("login window");
        let app = App::new(Rc::clone(&host));
        Self {
            host,
            state,
            _window: window,
            app,
        }
    }

    fn key(&mut self, code: KeyCode) {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    fn focused_label(&self) -> Option<String> {
        let surface = self.host.top()?;
        let id = self.app.focused()?;
        match surface.widget(id)?.view {
            dialogkit_engine::scene::WidgetView::Button(label) => Some(label),
            dialogkit_engine::scene::WidgetView::Editor { label, .. } => Some(label),
            _ => None,
        }
    }

    fn screen(&mut self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");
        self.app.dirty = true;
        draw_frame(&mut terminal, &mut self.app).expect("draw");
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[test]
fn renders_labels_errors_and_actions() {
    let mut session = Session::open();
    let screen = session.screen();

    assert!(screen.contains(" Login "));
    assert!(screen.contains("User:"));
    assert!(screen.contains("Missing user"));
    assert!(screen.contains("PIN must be positive"));
    assert!(screen.contains("Secret:"));
    assert!(screen.contains("[ Edit ]"));
    assert!(screen.contains("[ Submit ]"));
    assert!(screen.contains("Esc close"));
}

#[test]
fn typing_commits_edits_and_reconciles() {
    let mut session = Session::open();
    assert_eq!(session.focused_label().as_deref(), Some("User"));

    session.type_text("ann");
    assert_eq!(session.state.borrow().user, "ann");
    assert!(!session.screen().contains("Missing user"));

    session.key(KeyCode::Backspace);
    assert_eq!(session.state.borrow().user, "an");
}

#[test]
fn numbers_are_held_until_they_parse() {
    let mut session = Session::open();
    session.key(KeyCode::Tab);
    assert_eq!(session.focused_label().as_deref(), Some("PIN"));

    session.key(KeyCode::Backspace);
    session.key(KeyCode::Char('-'));
    assert_eq!(session.state.borrow().pin, 0);
    session.key(KeyCode::Char('3'));
    assert_eq!(session.state.borrow().pin, -3);
    session.key(KeyCode::Home);
    session.key(KeyCode::Delete);
    assert_eq!(session.state.borrow().pin, 3);
    assert!(!session.screen().contains("PIN must be positive"));
}

#[test]
fn submit_joins_the_tab_order_once_valid() {
    let mut session = Session::open();
    session.type_text("ann");
    session.key(KeyCode::Tab);
    session.type_text("7");
    assert_eq!(session.state.borrow().pin, 7);

    let mut visited = Vec::new();
    for _ in 0..4 {
        session.key(KeyCode::Tab);
        visited.push(session.focused_label().unwrap_or_default());
    }
    assert_eq!(visited, ["Edit", "Remember", "Submit", "User"]);

    session.key(KeyCode::BackTab);
    session.key(KeyCode::Enter);
    assert_eq!(session.state.borrow().submitted, 1);
}

#[test]
fn space_toggles_boolean_editors() {
    let mut session = Session::open();
    for _ in 0..3 {
        session.key(KeyCode::Tab);
    }
    assert_eq!(session.focused_label().as_deref(), Some("Remember"));

    session.key(KeyCode::Char(' '));
    assert!(session.state.borrow().remember);
    assert!(session.screen().contains("[x]"));
}

#[test]
fn secret_popup_is_drawn_on_top_and_focused() {
    let mut session = Session::open();
    session.key(KeyCode::Tab);
    session.key(KeyCode::Tab);
    assert_eq!(session.focused_label().as_deref(), Some("Edit"));

    session.key(KeyCode::Enter);
    assert_eq!(session.host.surfaces().len(), 2);
    assert_eq!(session.focused_label().as_deref(), Some("Secret"));

    session.type_text("hunter2");
    assert_eq!(session.state.borrow().secret, "hunter2");
    let screen = session.screen();
    assert!(screen.contains("*******"));
    assert!(!screen.contains("hunter2"));

    session.key(KeyCode::Esc);
    assert_eq!(session.host.surfaces().len(), 1);
    assert_eq!(session.state.borrow().destroyed, 0);
}

#[test]
fn escape_and_ctrl_c_close_surfaces() {
    let mut session = Session::open();
    session.key(KeyCode::Tab);
    session.key(KeyCode::Tab);
    session.key(KeyCode::Enter);
    assert_eq!(session.host.surfaces().len(), 2);

    session.app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(session.app.should_exit());
    assert_eq!(session.state.borrow().destroyed, 1);

    let mut other = Session::open();
    other.key(KeyCode::Esc);
    assert!(other.app.should_exit());
    assert_eq!(other.state.borrow().destroyed, 1);
}
