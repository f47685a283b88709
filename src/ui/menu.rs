use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::{App, CustomField, MenuItem};
use crate::ui::{bold, dim, frame_chunks, render_legend, render_notice, txt};

fn item_label(item: MenuItem) -> String {
    match item {
        MenuItem::Preset(difficulty) => {
            let range = difficulty.range();
            format!("{:<8} {} - {}", difficulty.to_string(), range.min(), range.max())
        }
        MenuItem::Custom => "Custom".to_string(),
        MenuItem::Leaderboard => "Leaderboard".to_string(),
        MenuItem::Quit => "Quit".to_string(),
    }
}

fn field_span(value: &str, active: bool) -> Span<'static> {
    let style = if active {
        bold().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
    } else {
        dim()
    };
    let shown = if value.is_empty() { "_" } else { value };
    Span::styled(format!(" {shown} "), style)
}

pub fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let (body, notice_area, legend_area) = frame_chunks(area);

    let [title_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(body);

    Paragraph::new(txt::TITLE)
        .block(Block::default().borders(Borders::ALL).title("guessr"))
        .style(bold().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .render(title_area, buf);

    let custom_selected = app.menu.item() == MenuItem::Custom;
    let mut lines = Vec::new();
    for (idx, item) in MenuItem::ALL.iter().enumerate() {
        let selected = idx == app.menu.selected;
        let (marker, style) = if selected {
            ("> ", bold().fg(Color::Green))
        } else {
            ("  ", Style::default())
        };
        let mut spans = vec![Span::styled(format!("{marker}{}", item_label(*item)), style)];

        if *item == MenuItem::Custom {
            spans.push(Span::raw("  min"));
            spans.push(field_span(
                &app.menu.custom_min,
                custom_selected && app.menu.editing == CustomField::Min,
            ));
            spans.push(Span::raw("max"));
            spans.push(field_span(
                &app.menu.custom_max,
                custom_selected && app.menu.editing == CustomField::Max,
            ));
        }
        lines.push(Line::from(spans));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Left)
        .render(list_area.inner(ratatui::layout::Margin::new(2, 1)), buf);

    render_notice(app.notice.as_ref(), notice_area, buf);
    render_legend(
        if custom_selected {
            "(↑↓) select / (tab) switch field / (enter) play / (esc) quit"
        } else {
            "(↑↓) select / (enter) choose / (q)uit"
        },
        legend_area,
        buf,
    );
}
