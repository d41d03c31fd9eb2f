//! # TitleBar Component
//!
//! One-line bar at the top: the breadcrumb of the open path and its
//! composite code, plus a spinner while a step is loading.
//!
//! Purely presentational: every field is a prop, there is no internal state.
//!
//! ```text
//! stampnav | New Zealand › 1898 Pictorials › 1898  [NZ.014.1898]
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct TitleBar {
    pub breadcrumb: String,
    /// Composite code of the open path; empty at the root catalogue.
    pub code: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(breadcrumb: String, code: String, is_loading: bool, spinner_frame: usize) -> Self {
        Self {
            breadcrumb,
            code,
            is_loading,
            spinner_frame,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "stampnav",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(self.breadcrumb.clone(), Style::default().fg(Color::White)),
        ];
        if !self.code.is_empty() {
            spans.push(Span::styled(
                format!("  [{}]", self.code),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.is_loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(format!("  {glyph}"), Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
