use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::controller::SessionState;
use crate::game::Comparison;
use crate::score::display_score;
use crate::ui::{bold, centered_rect, dim, feedback, frame_chunks, render_legend, render_notice, txt};
use crate::util::format_elapsed;

/// How many past guesses stay on screen
const HISTORY_LINES: usize = 8;

fn comparison_style(comparison: Comparison) -> Style {
    match comparison {
        Comparison::Greater => bold().fg(Color::Red),
        Comparison::Less => bold().fg(Color::Blue),
        Comparison::Equal => bold().fg(Color::Green),
    }
}

pub fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let controller = &app.controller;
    let range = controller.range();
    let (body, notice_area, legend_area) = frame_chunks(area);

    let [header_area, status_area, input_area, feedback_area, history_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(body);

    Paragraph::new(Span::styled(
        format!("Guess a number from {} to {}", range.min(), range.max()),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(header_area, buf);

    let (lo, hi) = controller.hint_bounds();
    Paragraph::new(Line::from(vec![
        Span::styled(format_elapsed(app.shown_elapsed()), bold().fg(Color::Yellow)),
        Span::styled(format!("   steps {}", controller.steps()), dim()),
        Span::styled(format!("   between {lo} and {hi}"), dim()),
    ]))
    .alignment(Alignment::Center)
    .render(status_area, buf);

    let input_text = if app.input.is_empty() && controller.state() == SessionState::Idle {
        Span::styled("type a number to start", dim())
    } else {
        Span::styled(app.input.as_str(), bold())
    };
    Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("guess"))
        .alignment(Alignment::Center)
        .render(centered_rect(input_area, 30, 3), buf);

    let feedback_line = match (controller.last_comparison(), controller.last_round()) {
        (Some(Comparison::Equal), Some(round)) => Line::from(vec![
            Span::styled(txt::EQUAL, comparison_style(Comparison::Equal)),
            Span::styled(
                format!(
                    "  {} steps in {}, {} points",
                    round.steps,
                    format_elapsed(round.elapsed),
                    display_score(round.score)
                ),
                bold(),
            ),
        ]),
        (Some(comparison), _) => {
            Line::from(Span::styled(feedback(comparison), comparison_style(comparison)))
        }
        (None, _) => Line::default(),
    };
    Paragraph::new(feedback_line)
        .alignment(Alignment::Center)
        .render(feedback_area, buf);

    let history: Vec<Line> = controller
        .log()
        .iter()
        .rev()
        .take(HISTORY_LINES)
        .map(|record| {
            Line::from(vec![
                Span::styled(format!("{:>8}  ", record.value), dim()),
                Span::styled(feedback(record.comparison), comparison_style(record.comparison)),
            ])
        })
        .collect();
    Paragraph::new(history)
        .alignment(Alignment::Center)
        .render(history_area, buf);

    render_notice(app.notice.as_ref(), notice_area, buf);
    render_legend("(0-9) type / (enter) guess / (esc) menu", legend_area, buf);
}

pub fn render_save_prompt(app: &App, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(area, 44, 7);
    Clear.render(popup, buf);

    let points = app
        .controller
        .pending_save()
        .map(|round| display_score(round.score))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(format!("{points} points"), bold().fg(Color::Green))),
        Line::from(txt::SAVE_PROMPT),
        Line::from(Span::styled(format!("> {}_", app.input), bold().fg(Color::Yellow))),
        Line::from(Span::styled("(enter) save / (esc) skip", dim())),
    ];
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("save score"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

pub fn render_confirm(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(area, 44, 5);
    Clear.render(popup, buf);

    let lines = vec![
        Line::from(txt::CONFIRM_MENU),
        Line::from(Span::styled("(y)es / (n)o", dim())),
    ];
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("leave round")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}
