use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::leaderboard::LeaderboardEntry;
use crate::score::display_score;
use crate::ui::{bold, dim, frame_chunks, render_legend, render_notice, txt};

/// Pure presenter for one leaderboard line
pub fn present_row(place: usize, entry: &LeaderboardEntry) -> Row<'static> {
    let place_style = match place {
        1 => bold().fg(Color::Yellow),
        2 | 3 => bold().fg(Color::Cyan),
        _ => Style::default(),
    };

    Row::new(vec![
        Cell::from(place.to_string()).style(place_style),
        Cell::from(entry.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(display_score(entry.points).to_string()),
        Cell::from(
            entry
                .saved_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
        .style(dim()),
    ])
}

pub fn render_leaderboard(app: &App, area: Rect, buf: &mut Buffer) {
    let (body, notice_area, legend_area) = frame_chunks(area);
    let block = Block::default().borders(Borders::ALL).title("leaderboard");

    if app.standings.is_empty() {
        Paragraph::new(txt::EMPTY_LEADERBOARD)
            .block(block)
            .style(dim())
            .alignment(Alignment::Center)
            .render(body, buf);
    } else {
        // borders + header
        let visible = body.height.saturating_sub(3) as usize;
        let max_scroll = app.standings.len().saturating_sub(visible);
        let scroll = app.leaderboard_scroll.min(max_scroll);

        let rows: Vec<Row> = app
            .standings
            .ranked()
            .skip(scroll)
            .take(visible)
            .map(|(place, entry)| present_row(place, entry))
            .collect();

        let header = Row::new(vec!["#", "Name", "Points", "Saved"])
            .style(bold().fg(Color::Cyan));

        Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(12),
                Constraint::Length(10),
                Constraint::Length(17),
            ],
        )
        .header(header)
        .block(block)
        .render(body, buf);
    }

    render_notice(app.notice.as_ref(), notice_area, buf);
    render_legend("(↑↓) scroll / (p)lay / (b)ack", legend_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::ui::tests::{render_to_string, test_app};

    #[test]
    fn test_present_row_rounds_points() {
        let entry = LeaderboardEntry::new("Ann", 1234.6);
        let area = Rect::new(0, 0, 40, 1);
        let mut buffer = Buffer::empty(area);
        Table::new(
            vec![present_row(1, &entry)],
            [Constraint::Length(3), Constraint::Length(6), Constraint::Length(6), Constraint::Length(5)],
        )
        .render(area, &mut buffer);

        let line: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(line.contains("1"));
        assert!(line.contains("Ann"));
        assert!(line.contains("1235"));
        assert!(!line.contains("1234.6"));
        assert!(line.contains("-"));
    }

    #[test]
    fn test_empty_leaderboard_message() {
        let mut app = test_app();
        app.state = AppState::Leaderboard;
        let rendered = render_to_string(&app, 80, 24);
        assert!(rendered.contains(txt::EMPTY_LEADERBOARD));
    }

    #[test]
    fn test_leaderboard_rows_in_order() {
        let mut app = test_app();
        app.controller.leaderboard_mut().save("Ann", 50.4).unwrap();
        app.controller.leaderboard_mut().save("Bob", 80.6).unwrap();
        app.open_leaderboard();

        let rendered = render_to_string(&app, 80, 24);
        let bob = rendered.find("Bob").unwrap();
        let ann = rendered.find("Ann").unwrap();
        assert!(bob < ann);
        assert!(rendered.contains("81"));
        assert!(rendered.contains("50"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = test_app();
        for i in 0..40 {
            app.controller
                .leaderboard_mut()
                .save(&format!("p{i:02}"), f64::from(i))
                .unwrap();
        }
        app.open_leaderboard();
        app.leaderboard_scroll = 1000;

        let rendered = render_to_string(&app, 80, 24);
        // lowest score is always reachable at the bottom
        assert!(rendered.contains("p00"));
        assert!(!rendered.contains("p39"));
    }
}
