//! # Dialogkit Terminal Front End
//!
//! Shows dialogs built by `dialogkit-engine` in a terminal. Dialogs are built
//! into an in-memory [`SceneHost`]; this crate renders the live surfaces with
//! Ratatui and turns key presses into edits and button presses on them, so
//! the engine's handlers run exactly as they would under a graphical toolkit.
//!
//! ## Keys
//!
//! - Tab / Shift+Tab move focus between enabled buttons and editors
//! - typing edits the focused editor; every keystroke that parses is committed
//! - Enter presses the focused button (or moves on from an editor)
//! - Space toggles a boolean editor
//! - Esc closes the top-most surface, Ctrl+C closes all of them
//!
//! ## Architecture
//!
//! - **`app`**: key routing and the per-editor edit buffer
//! - **`ui::focus`**: tab order backed by `rat-focus`
//! - **`ui::render`**: drawing surfaces as bordered blocks
//! - **`ui::runtime`**: terminal lifecycle and the `tokio` event loop
//! - **`dispatch`**: `Send` handle for posting background results back

pub mod app;
pub mod dispatch;
pub mod ui;

use std::rc::Rc;

use anyhow::Result;
use dialogkit_engine::scene::SceneHost;

pub use app::App;
pub use dispatch::{Dispatcher, Inbox, channel};

/// Runs the terminal loop until every surface of `host` is closed.
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up, drawn to, or
/// restored.
pub async fn run<M>(host: Rc<SceneHost>, inbox: Inbox<M>, on_message: impl FnMut(M)) -> Result<()> {
    ui::runtime::run_app(host, inbox, on_message).await
}
