use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::game::{Comparison, GameSession};
use crate::leaderboard::LeaderboardStore;
use crate::range::RangeConfig;
use crate::score::score_for;
use crate::timer::ElapsedTimer;

pub const DEFAULT_NICKNAME: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Answer to "return to menu"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRequest {
    Proceed,
    NeedsConfirmation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessRecord {
    pub value: i64,
    pub comparison: Comparison,
}

/// Result of a won round, offered for saving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub range: RangeConfig,
    pub steps: u32,
    pub elapsed: Duration,
    pub score: f64,
}

/// Parse a raw guess. Surrounding whitespace is ignored.
pub fn parse_guess(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| Error::InvalidGuess(raw.to_string()))
}

/// Wires guesses, the stopwatch and the leaderboard together.
///
/// `Idle` until the first guess of a round, `Running` until the target is
/// found, then `Idle` again with a pending save offer.
#[derive(Debug)]
pub struct SessionController {
    session: GameSession,
    timer: ElapsedTimer,
    leaderboard: LeaderboardStore,
    state: SessionState,
    log: Vec<GuessRecord>,
    last_comparison: Option<Comparison>,
    last_round: Option<RoundSummary>,
    pending_save: Option<RoundSummary>,
    default_nickname: String,
}

impl SessionController {
    pub fn new(session: GameSession, timer: ElapsedTimer, leaderboard: LeaderboardStore) -> Self {
        Self {
            session,
            timer,
            leaderboard,
            state: SessionState::Idle,
            log: Vec::new(),
            last_comparison: None,
            last_round: None,
            pending_save: None,
            default_nickname: DEFAULT_NICKNAME.to_string(),
        }
    }

    pub fn with_default_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.set_default_nickname(nickname);
        self
    }

    /// Name used by `save_score` for blank input. Blank values are ignored.
    pub fn set_default_nickname(&mut self, nickname: impl Into<String>) {
        let nickname = nickname.into();
        if !nickname.trim().is_empty() {
            self.default_nickname = nickname.trim().to_string();
        }
    }

    /// Start over with new bounds; any round in progress is dropped
    pub fn configure(&mut self, range: RangeConfig) {
        self.session.set_range(range);
        self.clear_round();
        self.last_round = None;
        info!(%range, "range configured");
    }

    /// Validate raw form values, leaving the current configuration untouched on error
    pub fn configure_raw(&mut self, min: &str, max: &str) -> Result<RangeConfig> {
        let range = RangeConfig::parse(min, max)?;
        self.configure(range);
        Ok(range)
    }

    /// Submit a raw guess. Returns `None` when the input is not a number.
    pub fn guess(&mut self, raw: &str) -> Result<Option<Comparison>> {
        let value = match parse_guess(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!("ignoring guess: {}", e);
                return Ok(None);
            }
        };

        if self.state == SessionState::Idle {
            self.start_round();
        }

        let comparison = self.session.guess(value);
        self.log.push(GuessRecord { value, comparison });
        self.last_comparison = Some(comparison);
        debug!(value, ?comparison, steps = self.session.steps(), "guess evaluated");

        if comparison == Comparison::Equal {
            self.finish_round()?;
        }
        Ok(Some(comparison))
    }

    fn start_round(&mut self) {
        self.timer.reset();
        self.timer.start();
        self.log.clear();
        self.pending_save = None;
        self.state = SessionState::Running;
        info!(range = %self.session.range(), "round started");
    }

    fn finish_round(&mut self) -> Result<()> {
        self.timer.stop();
        let elapsed = self.timer.current();
        let steps = self.session.steps();
        let range = self.session.range();
        let score = score_for(range, steps, elapsed.as_secs_f64())?;

        let summary = RoundSummary {
            range,
            steps,
            elapsed,
            score,
        };
        self.last_round = Some(summary);
        self.pending_save = Some(summary);
        self.state = SessionState::Idle;
        info!(steps, elapsed_ms = elapsed.as_millis() as u64, score, "round won");
        Ok(())
    }

    /// Save the pending round under `name`, or the default nickname if blank.
    ///
    /// Returns the new entry id, or `None` when there is nothing to save. On a
    /// storage failure the round is discarded and the error returned.
    pub fn save_score(&mut self, name: &str) -> Result<Option<u64>> {
        let Some(summary) = self.pending_save.take() else {
            return Ok(None);
        };
        let name = match name.trim() {
            "" => self.default_nickname.as_str(),
            trimmed => trimmed,
        };

        match self.leaderboard.save(name, summary.score) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!("failed to save score, discarding: {}", e);
                Err(e)
            }
        }
    }

    pub fn decline_save(&mut self) {
        if self.pending_save.take().is_some() {
            debug!("save offer declined");
        }
    }

    pub fn request_menu(&self) -> MenuRequest {
        match self.state {
            SessionState::Idle => MenuRequest::Proceed,
            SessionState::Running => MenuRequest::NeedsConfirmation,
        }
    }

    /// Drop the round in progress without scoring it
    pub fn abandon_round(&mut self) {
        if self.state == SessionState::Running {
            info!(steps = self.session.steps(), "round abandoned");
        }
        self.session.reset();
        self.clear_round();
    }

    fn clear_round(&mut self) {
        self.timer.reset();
        self.log.clear();
        self.last_comparison = None;
        self.pending_save = None;
        self.state = SessionState::Idle;
    }

    /// Periodic host tick; drives stopwatch notifications
    pub fn on_tick(&mut self) {
        self.timer.on_tick();
    }

    pub fn set_timer_observer(&mut self, observer: impl FnMut(Duration) + 'static) {
        self.timer.set_observer(observer);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn range(&self) -> RangeConfig {
        self.session.range()
    }

    pub fn steps(&self) -> u32 {
        self.session.steps()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.current()
    }

    pub fn log(&self) -> &[GuessRecord] {
        &self.log
    }

    /// Narrowest interval still consistent with this round's guesses
    pub fn hint_bounds(&self) -> (i64, i64) {
        let range = self.session.range();
        self.log
            .iter()
            .fold((range.min(), range.max()), |(lo, hi), g| match g.comparison {
                Comparison::Less => (lo.max(g.value.saturating_add(1)), hi),
                Comparison::Greater => (lo, hi.min(g.value.saturating_sub(1))),
                Comparison::Equal => (g.value, g.value),
            })
    }

    pub fn last_comparison(&self) -> Option<Comparison> {
        self.last_comparison
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn pending_save(&self) -> Option<&RoundSummary> {
        self.pending_save.as_ref()
    }

    pub fn default_nickname(&self) -> &str {
        &self.default_nickname
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut LeaderboardStore {
        &mut self.leaderboard
    }
}
