//! # Bookmark Manager Component
//!
//! Full-screen overlay for opening and deleting saved paths.
//! Opened with Ctrl+O, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `BookmarkManagerState` lives in `TuiState`
//! - `BookmarkManager` is created each frame with borrowed state

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::bookmarks::Bookmark;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent state for the bookmark overlay.
pub struct BookmarkManagerState {
    pub bookmarks: Vec<Bookmark>,
    pub selected: usize,
    pub confirm_delete: bool,
    pub list_state: ListState,
}

/// Events emitted by the bookmark manager.
#[derive(Debug, PartialEq)]
pub enum BookmarkEvent {
    /// Restore this composite code.
    Open(String),
    /// Delete by bookmark ID.
    Delete(String),
    Dismiss,
}

impl BookmarkManagerState {
    pub fn new(bookmarks: Vec<Bookmark>) -> Self {
        let mut list_state = ListState::default();
        if !bookmarks.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            bookmarks,
            selected: 0,
            confirm_delete: false,
            list_state,
        }
    }

    /// Remove a bookmark from the local list after deletion.
    pub fn remove_bookmark(&mut self, id: &str) {
        self.bookmarks.retain(|b| b.id != id);
        if self.bookmarks.is_empty() {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(self.bookmarks.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

impl EventHandler for BookmarkManagerState {
    type Event = BookmarkEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<BookmarkEvent> {
        // Reset delete confirmation on any non-delete key
        let is_delete_key = matches!(event, TuiEvent::InputChar('d'));
        if !is_delete_key {
            self.confirm_delete = false;
        }

        match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => Some(BookmarkEvent::Dismiss),
            TuiEvent::CursorUp => {
                if !self.bookmarks.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.bookmarks.is_empty() {
                    self.selected = (self.selected + 1).min(self.bookmarks.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .bookmarks
                .get(self.selected)
                .map(|bookmark| BookmarkEvent::Open(bookmark.code.clone())),
            TuiEvent::InputChar('d') => {
                let id = self.bookmarks.get(self.selected)?.id.clone();
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(BookmarkEvent::Delete(id))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the bookmark overlay.
pub struct BookmarkManager<'a> {
    state: &'a mut BookmarkManagerState,
}

impl<'a> BookmarkManager<'a> {
    pub fn new(state: &'a mut BookmarkManagerState) -> Self {
        Self { state }
    }
}

impl Component for BookmarkManager<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 70, area);
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.confirm_delete {
            " Press d again to confirm delete | Esc Cancel "
        } else {
            " Enter Open  d Delete  Esc Back "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Bookmarks ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.state.bookmarks.is_empty() {
            let empty = Paragraph::new("No bookmarks yet. Press b on any path to save it.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        // Layout: "Jan 15  <title>   <code>"
        let inner_width = overlay.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .state
            .bookmarks
            .iter()
            .enumerate()
            .map(|(i, bookmark)| {
                let date = bookmark
                    .updated_at
                    .with_timezone(&Local)
                    .format("%b %d")
                    .to_string();
                let code_width = bookmark.code.width().min(inner_width / 3);
                let code = truncate_str(&bookmark.code, code_width);
                let fixed_width = date.width() + 2 + code.width() + 2;
                let title_width = inner_width.saturating_sub(fixed_width);
                let title = truncate_str(&bookmark.title, title_width);
                let padded_title = format!("{:<width$}", title, width = title_width);

                let style = if i == self.state.selected {
                    let fg = if self.state.confirm_delete {
                        Color::Red
                    } else {
                        Color::White
                    };
                    Style::default()
                        .fg(fg)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(date, style),
                    Span::styled("  ", style),
                    Span::styled(padded_title, style),
                    Span::styled("  ", style),
                    Span::styled(code, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
