use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::state::Browser;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{BookmarkManager, DetailView, OptionList, SideBar, TitleBar};

const SIDE_BAR_WIDTH: u16 = 22;
const KEY_HELP: &str = "Enter open  ← back  x close all  1-7 side  b bookmark  ^O bookmarks  q quit";

pub fn draw_ui(frame: &mut Frame, browser: &Browser, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let full_area = frame.area();
    let [title_area, main_area, status_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(full_area);
    let [list_area, side_area] =
        Layout::horizontal([Min(0), Length(SIDE_BAR_WIDTH)]).areas(main_area);

    TitleBar::new(
        browser.breadcrumb(),
        browser.current_code().to_string(),
        browser.is_loading,
        spinner_frame,
    )
    .render(frame, title_area);

    if let Some(error_msg) = &browser.error {
        draw_error_view(frame, list_area, error_msg);
    } else if let Some(record) = browser.controller.top().and_then(|t| t.detail.as_ref()) {
        DetailView::new(record).render(frame, list_area);
    } else {
        let heading = match browser.controller.top() {
            None => "Countries".to_string(),
            Some(top) => match top.kind.child_kind() {
                Some(kind) if top.kind.is_side_category() => {
                    format!("{} › {}", top.kind.label(), kind.label())
                }
                Some(kind) => kind.label().to_string(),
                None => top.kind.label().to_string(),
            },
        };
        OptionList::new(&mut tui.option_list, browser.visible_options(), heading)
            .render(frame, list_area);
    }

    SideBar::new(
        browser.controller.available_side_categories(),
        browser.controller.top().is_some(),
    )
    .render(frame, side_area);

    draw_status_line(frame, status_area, &browser.status_message);

    if let Some(ref mut manager) = tui.bookmark_manager {
        BookmarkManager::new(manager).render(frame, full_area);
    }
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let text = vec![
        Line::from(Span::styled(error_msg, Style::default().fg(Color::Red))),
        Line::default(),
        Line::from(Span::styled(
            "Press any key to dismiss.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Error "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_status_line(frame: &mut Frame, area: Rect, status: &str) {
    let line = Line::from(vec![
        Span::styled(status, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(line, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bookmarks::Bookmark;
    use crate::test_support::{nz_provider, option};
    use crate::tui::components::BookmarkManagerState;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn render(browser: &Browser, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, browser, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_root_catalogue_lists_countries() {
        let mut browser = Browser::new(Arc::new(nz_provider()));
        browser.roots = vec![option("NZ", "New Zealand"), option("AU", "Australia")];
        let mut tui = TuiState::new();
        tui.option_list.reset(2);

        let text = render(&browser, &mut tui);
        assert!(text.contains("Countries"));
        assert!(text.contains("New Zealand"));
        assert!(text.contains("Choose a country"));
        assert!(text.contains("Postal History"));
    }

    #[tokio::test]
    async fn test_open_path_shows_breadcrumb_and_next_step() {
        let mut browser = Browser::new(Arc::new(nz_provider()));
        browser.controller.open_root(&option("NZ", "New Zealand")).await.unwrap();
        browser.controller.drill(&option("014", "1898 Pictorials")).await.unwrap();
        let mut tui = TuiState::new();
        tui.option_list.reset(browser.visible_options().len());

        let text = render(&browser, &mut tui);
        assert!(text.contains("New Zealand › 1898 Pictorials"));
        assert!(text.contains("[NZ.014]"));
        assert!(text.contains("Year"));
        assert!(text.contains("1899"));
    }

    #[tokio::test]
    async fn test_detail_replaces_option_list() {
        let mut browser = Browser::new(Arc::new(nz_provider()));
        browser.controller.restore("NZ.014.~errors").await.unwrap();
        browser
            .controller
            .select_detail(&option("E1", "Inverted centre"))
            .await
            .unwrap();
        let mut tui = TuiState::new();

        let text = render(&browser, &mut tui);
        assert!(text.contains("Stamp"));
        assert!(text.contains("known_copies"));
    }

    #[test]
    fn test_error_view() {
        let mut browser = Browser::new(Arc::new(nz_provider()));
        browser.error = Some("failed to load Year under 'NZ.014': network error".to_string());
        let mut tui = TuiState::new();

        let text = render(&browser, &mut tui);
        assert!(text.contains("Error"));
        assert!(text.contains("failed to load Year"));
    }

    #[test]
    fn test_bookmark_overlay_draws_on_top() {
        let browser = Browser::new(Arc::new(nz_provider()));
        let mut tui = TuiState::new();
        tui.bookmark_manager = Some(BookmarkManagerState::new(vec![Bookmark {
            id: "1".to_string(),
            title: "New Zealand › 1898 Pictorials".to_string(),
            code: "NZ.014".to_string(),
            breadcrumb: vec![],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }]));

        let text = render(&browser, &mut tui);
        assert!(text.contains("Bookmarks"));
        assert!(text.contains("NZ.014"));
    }
}
