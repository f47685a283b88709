pub mod game;
pub mod leaderboard;
pub mod menu;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::{App, Notice};
use crate::game::Comparison;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Fixed player-facing strings
pub mod txt {
    pub const TITLE: &str = "Guess the number";
    pub const GREATER: &str = "Too high";
    pub const LESS: &str = "Too low";
    pub const EQUAL: &str = "You guessed the number!";
    pub const RANGE_ORDER_ERROR: &str = "Minimum must be less than maximum!";
    pub const SAVE_PROMPT: &str = "Save your score? Enter a nickname";
    pub const CONFIRM_MENU: &str = "Abandon the current round and return to the menu?";
    pub const SAVED: &str = "Score saved";
    pub const EMPTY_LEADERBOARD: &str = "No scores yet";
}

pub fn feedback(comparison: Comparison) -> &'static str {
    match comparison {
        Comparison::Greater => txt::GREATER,
        Comparison::Less => txt::LESS,
        Comparison::Equal => txt::EQUAL,
    }
}

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// A `width` x `height` box centred in `area`, clipped to fit
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Splits the screen into body, notice line and key legend
pub(crate) fn frame_chunks(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

pub(crate) fn render_notice(notice: Option<&Notice>, area: Rect, buf: &mut Buffer) {
    let Some(notice) = notice else {
        return;
    };
    let style = if notice.is_error {
        bold().fg(Color::Red)
    } else {
        bold().fg(Color::Green)
    };
    Paragraph::new(Span::styled(notice.text.as_str(), style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

pub(crate) fn render_legend(text: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(text, italic()))
        .alignment(Alignment::Center)
        .render(area, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}
