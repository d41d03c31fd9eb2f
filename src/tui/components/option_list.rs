//! # OptionList Component
//!
//! The main pane: the options of the top frame (or the root catalogue),
//! one per line, with a highlighted cursor.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `OptionListState` lives in `TuiState` and survives across frames
//! - `OptionList` is created each frame with borrowed state and options

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::catalogue::CatalogueOption;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PAGE: usize = 10;

/// Cursor position in the option list.
pub struct OptionListState {
    pub list_state: ListState,
    /// Number of options the cursor moves over.
    pub len: usize,
}

pub enum OptionListEvent {
    /// Open the option at this index.
    Select(usize),
}

impl OptionListState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            len: 0,
        }
    }

    /// Point the cursor at the first of `len` options.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.list_state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected().filter(|&i| i < self.len)
    }

    fn move_by(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, self.len as isize - 1);
        self.list_state.select(Some(next as usize));
    }
}

impl Default for OptionListState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for OptionListState {
    type Event = OptionListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<OptionListEvent> {
        match event {
            TuiEvent::CursorUp => self.move_by(-1),
            TuiEvent::CursorDown => self.move_by(1),
            TuiEvent::PageUp => self.move_by(-(PAGE as isize)),
            TuiEvent::PageDown => self.move_by(PAGE as isize),
            TuiEvent::Submit => return self.selected().map(OptionListEvent::Select),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper.
pub struct OptionList<'a> {
    state: &'a mut OptionListState,
    options: &'a [CatalogueOption],
    /// Block title, e.g. "Year" or "Countries".
    heading: String,
}

impl<'a> OptionList<'a> {
    pub fn new(
        state: &'a mut OptionListState,
        options: &'a [CatalogueOption],
        heading: String,
    ) -> Self {
        Self {
            state,
            options,
            heading,
        }
    }
}

impl Component for OptionList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.heading));

        if self.options.is_empty() {
            let empty = Paragraph::new("Nothing listed here.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|option| {
                let mut spans = vec![Span::raw(option.label.clone())];
                if let Some(segment) = option.segment.as_deref()
                    && segment != option.label
                {
                    spans.push(Span::styled(
                        format!("  ({segment})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}
