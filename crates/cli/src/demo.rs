//! The sample dialog shown by the demo binary.
//!
//! Actions never touch the output field directly. They post a message to the
//! terminal loop, which writes the field and refreshes its editor once the
//! current pass has finished, the same way a host toolkit would schedule a
//! change on its own context.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use dialogkit_engine::{DialogSchema, DialogState, MemberRegistry, Window};
use dialogkit_tui::Dispatcher;
use dialogkit_types::{ActionDescriptor, ErrorMap, OptionDescriptor, ParsedText};
use tracing::{debug, info};

/// Delay of the simulated background job started by the middle action.
const BACKGROUND_DELAY: Duration = Duration::from_millis(400);

/// Work finished elsewhere that must be applied on the terminal loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoMessage {
    Output(String),
}

/// A 2x2 matrix edited as `a b; c d`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Matrix2 {
    pub rows: [[f64; 2]; 2],
}

impl Matrix2 {
    pub const IDENTITY: Self = Self { rows: [[1.0, 0.0], [0.0, 1.0]] };

    pub fn determinant(&self) -> f64 {
        let [[a, b], [c, d]] = self.rows;
        a * d - b * c
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[a, b], [c, d]] = self.rows;
        write!(f, "{a} {b}; {c} {d}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMatrixError;

impl fmt::Display for ParseMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected two rows of two numbers, e.g. `1 0; 0 1`")
    }
}

impl std::error::Error for ParseMatrixError {}

impl FromStr for Matrix2 {
    type Err = ParseMatrixError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut rows = [[0.0; 2]; 2];
        let mut parsed_rows = input.split(';');
        for row in &mut rows {
            let mut cells = parsed_rows.next().ok_or(ParseMatrixError)?.split_whitespace();
            for cell in row.iter_mut() {
                *cell = cells.next().ok_or(ParseMatrixError)?.parse().map_err(|_| ParseMatrixError)?;
            }
            if cells.next().is_some() {
                return Err(ParseMatrixError);
            }
        }
        if parsed_rows.next().is_some() {
            return Err(ParseMatrixError);
        }
        Ok(Self { rows })
    }
}

#[derive(Default)]
pub struct DemoDialog {
    pub output: String,
    pub matrix: Matrix2,
    pub text: String,
    dispatcher: Option<Dispatcher<DemoMessage>>,
}

impl DemoDialog {
    pub fn new(dispatcher: Dispatcher<DemoMessage>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
            ..Self::default()
        }
    }

    fn post_output(&self, output: impl Into<String>) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.post(DemoMessage::Output(output.into()));
        }
    }

    fn on_left(&mut self) {
        info!("left pressed");
        self.post_output("OnLeft");
    }

    fn on_middle(&mut self) {
        info!("middle pressed; finishing in the background");
        let Some(dispatcher) = self.dispatcher.clone() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(BACKGROUND_DELAY).await;
            dispatcher.post(DemoMessage::Output("OnMiddle".to_string()));
        });
    }

    fn on_right(&mut self) {
        info!("right pressed");
        self.post_output("OnRight");
    }
}

impl DialogState for DemoDialog {
    fn update_and_validate(&mut self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let determinant = self.matrix.determinant();
        if determinant == 0.0 {
            errors.insert("matrix", "Determinant == 0");
        } else if determinant == 1.0 {
            errors.insert("matrix", "Determinant == 1");
        }
        if self.text.is_empty() {
            errors.insert("text", "Missing text");
        } else if self.text.to_lowercase() == self.text && self.matrix.rows[0][0] == 0.0 {
            errors.insert("special", "lowercase text and matrix_0_0 == 0");
        }
        debug!(matrix = %self.matrix, text = %self.text, errors = errors.len(), "validated demo dialog");
        self.post_output(format!("{} {}", self.matrix, self.text));
        errors
    }

    fn on_destroy(&mut self) {
        info!("demo dialog destroyed");
    }
}

impl DialogSchema for DemoDialog {
    fn describe(members: &mut MemberRegistry<Self>) {
        members
            .option("output", OptionDescriptor::new("Output"), |state| &mut state.output)
            .mapped_option("matrix", OptionDescriptor::new("A Matrix").secret(), ParsedText::<Matrix2>::new(), |state| &mut state.matrix)
            .option("text", OptionDescriptor::new("Some Text"), |state| &mut state.text)
            .action("left", ActionDescriptor::new("Left"), Self::on_left)
            .action("middle", ActionDescriptor::new("Middle").unvalidated(), Self::on_middle)
            .action("right", ActionDescriptor::new("Right").scoped(["text"]), Self::on_right);
    }
}

/// Applies a posted message on the owning loop.
pub fn apply(window: &Window<DemoDialog>, message: DemoMessage) {
    match message {
        DemoMessage::Output(output) => {
            if !window.is_open() {
                return;
            }
            window.dialog().state().borrow_mut().output = output;
            window.dialog().root().reset_keys(&["output"]);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use dialogkit_engine::scene::SceneHost;
    use dialogkit_engine::{DialogBuilder, DialogConfig, Host, shared};
    use dialogkit_tui::channel;

    use super::*;

    #[test]
    fn matrices_round_trip_through_text() {
        let matrix: Matrix2 = "2 0; 0 3".parse().expect("matrix");
        assert_eq!(matrix.determinant(), 6.0);
        assert_eq!(matrix.to_string().parse::<Matrix2>(), Ok(matrix));
        assert_eq!("1 2 3; 4 5".parse::<Matrix2>(), Err(ParseMatrixError));
        assert_eq!("1 2".parse::<Matrix2>(), Err(ParseMatrixError));
    }

    #[test]
    fn validation_reports_determinant_and_text_problems() {
        let mut dialog = DemoDialog::default();
        let errors = dialog.update_and_validate();
        assert_eq!(errors.get("matrix"), Some("Determinant == 0"));
        assert_eq!(errors.get("text"), Some("Missing text"));

        dialog.matrix = Matrix2::IDENTITY;
        dialog.text = "lower".to_string();
        let errors = dialog.update_and_validate();
        assert_eq!(errors.get("matrix"), Some("Determinant == 1"));
        assert!(!errors.contains_key("special"));

        dialog.matrix = "0 2; 3 0".parse().expect("matrix");
        let errors = dialog.update_and_validate();
        assert_eq!(errors.get("special"), Some("lowercase text and matrix_0_0 == 0"));
    }

    #[test]
    fn posted_output_is_written_back_into_the_editor() {
        let (dispatcher, mut inbox) = channel();
        let host = SceneHost::new();
        let window = DialogBuilder::<DemoDialog>::new()
            .build_window("Demo", host.clone() as Rc<dyn Host>, Rc::new(DialogConfig::default()), shared(DemoDialog::new(dispatcher)))
            .expect("demo window");
        let surface = host.top().expect("demo surface");

        inbox.drain(|message| apply(&window, message));
        let output = surface.find_editor("Output").expect("output editor");
        assert_eq!(surface.value_of(output).and_then(|value| value.as_str().map(str::to_string)).as_deref(), Some("0 0; 0 0 "));

        let right = surface.find_button("Right").expect("right button");
        assert!(!surface.press(right), "right waits for text");
        let text = surface.find_editor("Some Text").expect("text editor");
        surface.commit(text, "Hello".into());
        inbox.drain(|_| {});
        assert!(surface.press(right));
        inbox.drain(|message| apply(&window, message));
        assert_eq!(window.dialog().state().borrow().output, "OnRight");
    }
}
