//! Runtime: the owning event loop for dialogs shown in the terminal.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Forward terminal input from a blocking reader task over a channel.
//! - Apply messages posted by background work through the [`Inbox`].
//! - Drain deferred engine work after every event and redraw when dirty.
//!
//! The loop ends when the scene host has no live surface left.

use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dialogkit_engine::scene::SceneHost;
use ratatui::{Terminal, prelude::*};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::dispatch::Inbox;
use crate::ui::render;

const INPUT_POLL: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// Spawn a blocking reader that forwards `crossterm` events over a channel.
///
/// The reader polls with a timeout so it notices when the loop has dropped
/// the receiving end and can finish.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (sender, receiver) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        while !sender.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!("Failed to poll terminal input: {}", error);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if sender.send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Redraws when the app marked itself dirty.
pub fn draw_frame<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    if !app.dirty {
        return Ok(());
    }
    terminal
        .draw(|frame| render::draw(frame, app))
        .map_err(|error| anyhow::anyhow!("draw frame: {error}"))?;
    app.dirty = false;
    Ok(())
}

/// Runs the loop until every surface of `host` is closed.
///
/// `on_message` receives everything posted through the inbox's dispatcher and
/// runs on this loop, where dialog state may be touched.
pub async fn run_app<M>(host: Rc<SceneHost>, mut inbox: Inbox<M>, mut on_message: impl FnMut(M)) -> Result<()> {
    let mut input = spawn_input_reader();
    let mut app = App::new(host);
    let mut terminal = setup_terminal()?;
    let mut ticker = time::interval(IDLE_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("terminal loop started");

    let mut inbox_open = true;
    let outcome = async {
        draw_frame(&mut terminal, &mut app)?;
        while !app.should_exit() {
            tokio::select! {
                maybe_event = input.recv() => {
                    let Some(event) = maybe_event else {
                        warn!("terminal input closed");
                        break;
                    };
                    app.handle_event(event);
                }
                maybe_message = inbox.recv(), if inbox_open => {
                    match maybe_message {
                        Some(message) => {
                            on_message(message);
                            let more = inbox.drain(&mut on_message);
                            debug!(extra = more, "applied posted messages");
                            app.settle();
                        }
                        None => inbox_open = false,
                    }
                }
                _ = ticker.tick() => {
                    if app.host().has_pending() {
                        app.settle();
                    }
                }
            }
            draw_frame(&mut terminal, &mut app)?;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    cleanup_terminal(&mut terminal)?;
    info!("terminal loop finished");
    outcome
}
