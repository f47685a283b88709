use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};
use crate::ui::{game, leaderboard, menu};

/// A UI Screen boundary: renders one `AppState`
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        menu::render_menu(app, area, buf);
    }
}

pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        game::render_game(app, area, buf);
    }
}

/// Game screen with the nickname popup on top
pub struct SavePromptScreen;

impl Screen for SavePromptScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        game::render_game(app, area, buf);
        game::render_save_prompt(app, area, buf);
    }
}

/// Game screen with the leave-round confirmation on top
pub struct ConfirmScreen;

impl Screen for ConfirmScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        game::render_game(app, area, buf);
        game::render_confirm(area, buf);
    }
}

pub struct LeaderboardScreen;

impl Screen for LeaderboardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        leaderboard::render_leaderboard(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Playing => Box::new(GameScreen),
        AppState::SavePrompt => Box::new(SavePromptScreen),
        AppState::ConfirmMenu => Box::new(ConfirmScreen),
        AppState::Leaderboard => Box::new(LeaderboardScreen),
    }
}
