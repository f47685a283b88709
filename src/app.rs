use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::config::Config;
use crate::controller::{parse_guess, MenuRequest, SessionController};
use crate::error::Error;
use crate::game::Comparison;
use crate::leaderboard::Standings;
use crate::range::{Difficulty, RangeConfig};
use crate::util::push_within_width;

pub const GUESS_WIDTH: usize = 20;
pub const NICKNAME_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Playing,
    SavePrompt,
    ConfirmMenu,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Preset(Difficulty),
    Custom,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Preset(Difficulty::Easy),
        MenuItem::Preset(Difficulty::Normal),
        MenuItem::Preset(Difficulty::Hard),
        MenuItem::Custom,
        MenuItem::Leaderboard,
        MenuItem::Quit,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomField {
    Min,
    Max,
}

#[derive(Debug, Clone)]
pub struct MenuState {
    pub selected: usize,
    pub custom_min: String,
    pub custom_max: String,
    pub editing: CustomField,
}

impl MenuState {
    fn new(config: &Config) -> Self {
        let range = config.range();
        let selected = MenuItem::ALL
            .iter()
            .position(|item| match (item, config.custom_range) {
                (MenuItem::Custom, Some(_)) => true,
                (MenuItem::Preset(d), None) => *d == config.difficulty,
                _ => false,
            })
            .unwrap_or(0);
        Self {
            selected,
            custom_min: range.min().to_string(),
            custom_max: range.max().to_string(),
            editing: CustomField::Min,
        }
    }

    pub fn item(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    fn field_mut(&mut self) -> &mut String {
        match self.editing {
            CustomField::Min => &mut self.custom_min,
            CustomField::Max => &mut self.custom_max,
        }
    }
}

/// A one-line message shown under the active screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub controller: SessionController,
    pub config: Config,
    pub state: AppState,
    pub menu: MenuState,
    /// Guess field while playing, nickname field in the save prompt
    pub input: String,
    pub notice: Option<Notice>,
    /// Last value pushed by the stopwatch, refreshed once per second
    pub stopwatch: Rc<Cell<Duration>>,
    pub standings: Standings,
    pub leaderboard_scroll: usize,
}

impl App {
    pub fn new(mut controller: SessionController, config: Config) -> Self {
        let stopwatch = Rc::new(Cell::new(Duration::ZERO));
        let display = Rc::clone(&stopwatch);
        controller.set_timer_observer(move |elapsed| display.set(elapsed));

        Self {
            menu: MenuState::new(&config),
            controller,
            config,
            state: AppState::Menu,
            input: String::new(),
            notice: None,
            stopwatch,
            standings: Standings::default(),
            leaderboard_scroll: 0,
        }
    }

    /// Skip the menu and play on `range` straight away
    pub fn start_game(&mut self, range: RangeConfig) {
        self.controller.configure(range);
        self.config.remember_range(range);
        self.input.clear();
        self.notice = None;
        self.state = AppState::Playing;
    }

    pub fn on_tick(&mut self) {
        self.controller.on_tick();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Menu => return self.on_menu_key(key),
            AppState::Playing => self.on_playing_key(key),
            AppState::SavePrompt => self.on_save_prompt_key(key),
            AppState::ConfirmMenu => self.on_confirm_key(key),
            AppState::Leaderboard => self.on_leaderboard_key(key),
        }
        KeyOutcome::Continue
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let count = MenuItem::ALL.len();
        let custom = self.menu.item() == MenuItem::Custom;

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('q') if !custom => return KeyOutcome::Quit,
            KeyCode::Up => self.menu.selected = (self.menu.selected + count - 1) % count,
            KeyCode::Down => self.menu.selected = (self.menu.selected + 1) % count,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right if custom => {
                self.menu.editing = match self.menu.editing {
                    CustomField::Min => CustomField::Max,
                    CustomField::Max => CustomField::Min,
                };
            }
            KeyCode::Char(c) if custom && is_number_char(c) => {
                push_within_width(self.menu.field_mut(), c, GUESS_WIDTH);
            }
            KeyCode::Backspace if custom => {
                self.menu.field_mut().pop();
            }
            KeyCode::Enter => match self.menu.item() {
                MenuItem::Preset(difficulty) => self.start_game(difficulty.range()),
                MenuItem::Custom => self.start_custom_game(),
                MenuItem::Leaderboard => self.open_leaderboard(),
                MenuItem::Quit => return KeyOutcome::Quit,
            },
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn start_custom_game(&mut self) {
        match RangeConfig::parse(&self.menu.custom_min, &self.menu.custom_max) {
            Ok(range) => self.start_game(range),
            Err(Error::InvalidRange { .. }) => {
                self.notice = Some(Notice::error(crate::ui::txt::RANGE_ORDER_ERROR));
            }
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if is_number_char(c) => {
                push_within_width(&mut self.input, c, GUESS_WIDTH);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit_guess(),
            KeyCode::Esc => match self.controller.request_menu() {
                MenuRequest::Proceed => self.back_to_menu(),
                MenuRequest::NeedsConfirmation => self.state = AppState::ConfirmMenu,
            },
            _ => {}
        }
    }

    fn submit_guess(&mut self) {
        let raw = std::mem::take(&mut self.input);
        let range = self.controller.range();
        if let Ok(n) = parse_guess(&raw) {
            if !range.contains(n) {
                self.notice = Some(Notice::error(format!(
                    "Enter a number from {} to {}",
                    range.min(),
                    range.max()
                )));
                return;
            }
        }

        match self.controller.guess(&raw) {
            Ok(Some(Comparison::Equal)) => {
                self.notice = None;
                self.input = self.config.nickname.clone();
                self.state = AppState::SavePrompt;
            }
            Ok(Some(_)) => self.notice = None,
            Ok(None) => {}
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
    }

    fn on_save_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !c.is_control() => {
                push_within_width(&mut self.input, c, NICKNAME_WIDTH);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.input);
                match self.controller.save_score(&name) {
                    Ok(_) => {
                        if !name.trim().is_empty() {
                            self.config.nickname = name.trim().to_string();
                            self.controller.set_default_nickname(name.trim());
                        }
                        self.open_leaderboard();
                        if self.notice.is_none() {
                            self.notice = Some(Notice::info(crate::ui::txt::SAVED));
                        }
                    }
                    Err(e) => {
                        self.notice = Some(Notice::error(format!("Could not save score: {e}")));
                        self.state = AppState::Playing;
                    }
                }
            }
            KeyCode::Esc => {
                self.controller.decline_save();
                self.input.clear();
                self.state = AppState::Playing;
            }
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.controller.abandon_round();
                self.back_to_menu();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Playing;
            }
            _ => {}
        }
    }

    fn on_leaderboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.leaderboard_scroll = self.leaderboard_scroll.saturating_sub(1),
            KeyCode::Down => self.leaderboard_scroll += 1,
            KeyCode::PageUp => self.leaderboard_scroll = self.leaderboard_scroll.saturating_sub(10),
            KeyCode::PageDown => self.leaderboard_scroll += 10,
            KeyCode::Home => self.leaderboard_scroll = 0,
            KeyCode::Char('p') | KeyCode::Enter => {
                self.notice = None;
                self.input.clear();
                self.state = AppState::Playing;
            }
            KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => self.back_to_menu(),
            _ => {}
        }
        // clamped again at render time against the visible height
        self.leaderboard_scroll = self
            .leaderboard_scroll
            .min(self.standings.len().saturating_sub(1));
    }

    pub fn open_leaderboard(&mut self) {
        self.notice = None;
        self.standings = match self.controller.leaderboard().list() {
            Ok(standings) => standings,
            Err(e) => {
                warn!("failed to read leaderboard: {}", e);
                self.notice = Some(Notice::error(format!("Could not read leaderboard: {e}")));
                Standings::default()
            }
        };
        self.leaderboard_scroll = 0;
        self.state = AppState::Leaderboard;
    }

    fn back_to_menu(&mut self) {
        self.input.clear();
        self.notice = None;
        self.state = AppState::Menu;
    }

    /// Stopwatch label value: the live display while running, exact time otherwise
    pub fn shown_elapsed(&self) -> Duration {
        match self.controller.state() {
            crate::controller::SessionState::Running => self.stopwatch.get(),
            crate::controller::SessionState::Idle => self.controller.elapsed(),
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}
