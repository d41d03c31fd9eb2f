//! # DetailView Component
//!
//! Shown in place of the option list once the path ends at a single stamp.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::Value;

use crate::catalogue::DetailRecord;
use crate::tui::component::Component;

pub struct DetailView<'a> {
    pub record: &'a DetailRecord,
}

impl<'a> DetailView<'a> {
    pub fn new(record: &'a DetailRecord) -> Self {
        Self { record }
    }
}

/// Strings render bare; everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Component for DetailView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key_width = self
            .record
            .attributes
            .keys()
            .map(|k| k.len())
            .max()
            .unwrap_or(0);

        let mut lines = vec![
            Line::from(Span::styled(
                self.record.title.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.record.code.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];
        lines.extend(self.record.attributes.iter().map(|(key, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:<key_width$}  "),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(display_value(value)),
            ])
        }));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Stamp ");
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}
