//! # Actions
//!
//! Everything that can happen in the browser becomes an `Action`.
//! User picks an option? That's `Action::Select(option)`.
//! Provider answers? That's `Action::StepLoaded { ticket, result }`.
//!
//! `update()` applies an action to the state and returns an `Effect`: the I/O
//! the front-end must perform next (fetch, restore, save). No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::catalogue::CatalogueOption;
use crate::core::controller::{Loaded, RestoreTicket, Ticket};
use crate::core::error::NavError;
use crate::core::stack::NavigationStack;
use crate::core::state::Browser;
use crate::core::step::SideCategory;

pub enum Action {
    /// Ask for the top-level catalogue.
    LoadRoots,
    RootsLoaded(Result<Vec<CatalogueOption>, NavError>),
    /// Pick an option on screen: opens a root or drills into the next step.
    Select(CatalogueOption),
    OpenSideCategory(SideCategory),
    StepLoaded {
        ticket: Ticket,
        result: Result<Loaded, NavError>,
    },
    Close,
    CloseAll,
    /// Rebuild the path for a composite code (bookmark or `--open`).
    Restore(String),
    /// A stack rebuilt off to the side, ready to replace the current one
    /// unless a newer request has been begun since.
    Restored {
        ticket: RestoreTicket,
        result: Result<NavigationStack, NavError>,
    },
    SaveBookmark,
    /// A bookmark was written (or failed to be); carries the status line.
    BookmarkSaved(String),
    DismissError,
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug)]
pub enum Effect {
    None,
    LoadRoots,
    Load(Ticket),
    Restore(RestoreTicket),
    SaveBookmark,
    Quit,
}

pub fn update(state: &mut Browser, action: Action) -> Effect {
    match action {
        Action::LoadRoots => {
            state.is_loading = true;
            state.status_message = "Loading catalogue...".to_string();
            Effect::LoadRoots
        }
        Action::RootsLoaded(Ok(roots)) => {
            state.is_loading = false;
            state.error = None;
            state.status_message = format!("{} countries", roots.len());
            state.roots = roots;
            Effect::None
        }
        Action::RootsLoaded(Err(e)) => {
            fail(state, &e);
            Effect::None
        }
        Action::Select(option) => {
            let ticket = if state.controller.top().is_none() {
                Ok(state.controller.begin_open_root(&option))
            } else {
                state.controller.begin_drill(&option)
            };
            begin(state, ticket)
        }
        Action::OpenSideCategory(category) => {
            let ticket = state.controller.begin_side_category(category);
            begin(state, ticket)
        }
        Action::StepLoaded { ticket, result } => {
            match state.controller.commit(ticket, result) {
                Ok(entry) => {
                    info!("Now at '{}'", entry.code);
                    state.status_message = format!("{} options", entry.options.len());
                    state.is_loading = false;
                    state.error = None;
                }
                Err(NavError::Superseded) => {
                    debug!("Dropped a superseded result");
                }
                Err(e) => fail(state, &e),
            }
            Effect::None
        }
        Action::Close => {
            if let Err(e) = state.controller.close() {
                debug!("Close ignored: {}", e);
            }
            state.is_loading = false;
            state.error = None;
            state.status_message = state.breadcrumb();
            Effect::None
        }
        Action::CloseAll => {
            state.controller.close_all();
            state.is_loading = false;
            state.error = None;
            state.status_message = "Choose a country".to_string();
            Effect::None
        }
        Action::Restore(code) => {
            let ticket = state.controller.begin_restore(&code);
            state.is_loading = true;
            state.status_message = format!("Opening {code}...");
            Effect::Restore(ticket)
        }
        Action::Restored { ticket, result } => {
            match state.controller.commit_restore(ticket, result) {
                Ok(_) => {
                    state.is_loading = false;
                    state.error = None;
                    state.status_message = state.breadcrumb();
                }
                Err(NavError::Superseded) => {
                    debug!("Dropped a superseded restore");
                }
                Err(e) => fail(state, &e),
            }
            Effect::None
        }
        Action::SaveBookmark => {
            if state.controller.top().is_none() {
                state.status_message = "Nothing to bookmark".to_string();
                Effect::None
            } else {
                Effect::SaveBookmark
            }
        }
        Action::BookmarkSaved(message) => {
            state.status_message = message;
            Effect::None
        }
        Action::DismissError => {
            state.error = None;
            state.status_message = state.breadcrumb();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn begin(state: &mut Browser, ticket: Result<Ticket, NavError>) -> Effect {
    match ticket {
        Ok(ticket) => {
            state.is_loading = true;
            state.status_message = format!("Loading {}...", ticket.title());
            Effect::Load(ticket)
        }
        Err(e) => {
            fail(state, &e);
            Effect::None
        }
    }
}

fn fail(state: &mut Browser, error: &NavError) {
    warn!("Navigation error: {}", error);
    state.is_loading = false;
    state.error = Some(error.to_string());
    state.status_message = "Error".to_string();
}
