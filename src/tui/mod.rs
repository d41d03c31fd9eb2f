//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the browser,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Fetching
//!
//! `update()` never touches the provider. When it returns `Effect::Load`,
//! the ticket is moved into a tokio task that runs the fetch and sends
//! `Action::StepLoaded` back over an mpsc channel. The event loop drains
//! that channel every tick, so the screen stays live while a step loads and
//! a newer selection simply outruns an older one.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner turns.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::bookmarks;
use crate::core::controller::{RestoreTicket, StackController, Ticket};
use crate::core::state::Browser;
use crate::tui::component::EventHandler;
use crate::tui::components::side_bar::category_for_key;
use crate::tui::components::{BookmarkEvent, BookmarkManagerState, OptionListEvent, OptionListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core navigation logic)
pub struct TuiState {
    pub option_list: OptionListState,
    // Bookmark overlay (None = hidden)
    pub bookmark_manager: Option<BookmarkManagerState>,
    // (stack generation, visible option count) the cursor was last reset for
    shown: Option<(u64, usize)>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            option_list: OptionListState::new(),
            bookmark_manager: None,
            shown: None,
        }
    }

    /// Put the cursor back on the first option whenever the listing changes.
    fn sync(&mut self, browser: &Browser) {
        let key = (
            browser.controller.stack().generation(),
            browser.visible_options().len(),
        );
        if self.shown != Some(key) {
            self.option_list.reset(key.1);
            self.shown = Some(key);
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Run the browser until the user quits. `start_code`, if given, is
/// restored as soon as the terminal is up.
pub fn run(mut browser: Browser, start_code: Option<String>) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    dispatch(&mut browser, Action::LoadRoots, &tx);
    if let Some(code) = start_code {
        dispatch(&mut browser, Action::Restore(code), &tx);
    }

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync(&browser);

        if browser.is_loading {
            needs_redraw = true;
        }
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &browser, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if browser.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &mut browser, &mut tui, &tx) {
                break 'main;
            }
            tui.sync(&browser);
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatch(&mut browser, action, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    info!("stampnav shutting down");
    Ok(())
}

/// Route one terminal event. Returns true when the app should quit.
fn handle_event(
    event: TuiEvent,
    browser: &mut Browser,
    tui: &mut TuiState,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => false,
        // Ctrl+C always quits, whatever has focus
        TuiEvent::ForceQuit => dispatch(browser, Action::Quit, tx),
        TuiEvent::OpenBookmarks => {
            let index = bookmarks::bookmarks_dir()
                .and_then(|dir| bookmarks::load_index(&dir))
                .unwrap_or_else(|e| {
                    warn!("Failed to load bookmarks: {}", e);
                    bookmarks::BookmarkIndex::default()
                });
            tui.bookmark_manager = Some(BookmarkManagerState::new(index.bookmarks));
            false
        }
        event => {
            // When the bookmark overlay is open, route all events to it
            if let Some(manager) = tui.bookmark_manager.as_mut() {
                return match manager.handle_event(&event) {
                    Some(BookmarkEvent::Open(code)) => {
                        tui.bookmark_manager = None;
                        dispatch(browser, Action::Restore(code), tx)
                    }
                    Some(BookmarkEvent::Delete(id)) => {
                        match bookmarks::bookmarks_dir().and_then(|dir| bookmarks::delete_bookmark(&dir, &id)) {
                            Ok(Some(removed)) => info!("Deleted bookmark '{}'", removed.title),
                            Ok(None) => debug!("Bookmark {} was already gone", id),
                            Err(e) => warn!("Failed to delete bookmark {}: {}", id, e),
                        }
                        manager.remove_bookmark(&id);
                        false
                    }
                    Some(BookmarkEvent::Dismiss) => {
                        tui.bookmark_manager = None;
                        false
                    }
                    None => false,
                };
            }

            match browse_action(&event, browser, tui) {
                Some(action) => dispatch(browser, action, tx),
                None => false,
            }
        }
    }
}

/// Map a key pressed on the main browser view to an action.
fn browse_action(event: &TuiEvent, browser: &Browser, tui: &mut TuiState) -> Option<Action> {
    // Any key dismisses the error view
    if browser.error.is_some() {
        return Some(Action::DismissError);
    }

    match event {
        TuiEvent::Escape | TuiEvent::InputChar('q') => Some(Action::Quit),
        TuiEvent::Back => Some(Action::Close),
        TuiEvent::InputChar('x') => Some(Action::CloseAll),
        TuiEvent::InputChar('b') => Some(Action::SaveBookmark),
        TuiEvent::InputChar(c) => category_for_key(*c).map(Action::OpenSideCategory),
        other => match tui.option_list.handle_event(other)? {
            OptionListEvent::Select(index) => browser
                .visible_options()
                .get(index)
                .cloned()
                .map(Action::Select),
        },
    }
}

/// Apply an action and carry out the effect it asks for.
/// Returns true when the app should quit.
fn dispatch(browser: &mut Browser, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(browser, action) {
        Effect::None => false,
        Effect::LoadRoots => {
            spawn_roots(browser, tx.clone());
            false
        }
        Effect::Load(ticket) => {
            spawn_load(browser, ticket, tx.clone());
            false
        }
        Effect::Restore(ticket) => {
            spawn_restore(browser, ticket, tx.clone());
            false
        }
        Effect::SaveBookmark => {
            let message = bookmarks::save_current(browser.current_stack());
            dispatch(browser, Action::BookmarkSaved(message), tx)
        }
        Effect::Quit => true,
    }
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to send action: receiver dropped");
    }
}

fn spawn_roots(browser: &Browser, tx: mpsc::Sender<Action>) {
    let provider = browser.controller.provider();
    tokio::spawn(async move {
        let result = StackController::new(provider).root_options().await;
        send(&tx, Action::RootsLoaded(result));
    });
}

fn spawn_load(browser: &Browser, ticket: Ticket, tx: mpsc::Sender<Action>) {
    info!("Spawning {} fetch for '{}'", ticket.kind(), ticket.code());
    let provider = browser.controller.provider();
    tokio::spawn(async move {
        let result = ticket.load(provider.as_ref()).await;
        send(&tx, Action::StepLoaded { ticket, result });
    });
}

/// Replays the path on a scratch controller; the live stack is only
/// replaced once the whole path has loaded.
fn spawn_restore(browser: &Browser, ticket: RestoreTicket, tx: mpsc::Sender<Action>) {
    info!("Spawning restore of '{}'", ticket.code());
    let provider = browser.controller.provider();
    tokio::spawn(async move {
        let result = ticket.replay(provider).await;
        debug!("Restore of '{}' finished: ok={}", ticket.code(), result.is_ok());
        send(&tx, Action::Restored { ticket, result });
    });
}
