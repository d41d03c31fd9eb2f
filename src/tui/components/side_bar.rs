//! # SideBar Component
//!
//! Lists the side-categories with their number keys. Categories already
//! open on the current path are dimmed; nothing is shown before a country
//! is open.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::step::SideCategory;
use crate::tui::component::Component;

pub struct SideBar {
    /// Categories that can still be opened from the top frame.
    pub available: Vec<SideCategory>,
    pub has_path: bool,
}

impl SideBar {
    pub fn new(available: Vec<SideCategory>, has_path: bool) -> Self {
        Self {
            available,
            has_path,
        }
    }
}

/// The side-category bound to a number key, `'1'` being the first.
pub fn category_for_key(c: char) -> Option<SideCategory> {
    let index = c.to_digit(10)?.checked_sub(1)? as usize;
    SideCategory::ALL.get(index).copied()
}

impl Component for SideBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Side ");

        let lines: Vec<Line> = SideCategory::ALL
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let open = self.has_path && self.available.contains(category);
                let style = if open {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
                };
                Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Yellow)),
                    Span::styled(category.label(), style),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
