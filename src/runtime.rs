use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Everything the main loop reacts to
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of input events for the main loop
pub trait GameEventSource: Send + 'static {
    /// Wait at most `timeout` for the next event
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads the terminal on a background thread and forwards key presses and resizes
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // release/repeat events would double every keystroke on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => GameEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(forwarded).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How often the loop wakes up when idle
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source for headless tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input events with ticks on a fixed schedule.
///
/// Ticks are due every `interval` regardless of input, so a player typing
/// steadily still sees the stopwatch advance.
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Next event, or `Tick` once the tick deadline has passed
    pub fn step(&mut self) -> GameEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.tick(now);
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // nothing will ever arrive; keep ticking at the normal pace
                std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.tick(Instant::now())
            }
        }
    }

    fn tick(&mut self, now: Instant) -> GameEvent {
        let interval = self.ticker.interval();
        let scheduled = self.next_tick + interval;
        // a stalled loop resumes on a fresh schedule instead of bursting
        self.next_tick = if scheduled <= now { now + interval } else { scheduled };
        GameEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc::Sender;

    fn key_event(c: char) -> GameEvent {
        GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn runner(interval_ms: u64) -> (Sender<GameEvent>, Runner<TestEventSource, FixedTicker>) {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(interval_ms)),
        );
        (tx, runner)
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, mut runner) = runner(1);
        assert!(matches!(runner.step(), GameEvent::Tick));
    }

    #[test]
    fn step_keeps_ticking_when_source_is_gone() {
        let (tx, mut runner) = runner(5);
        drop(tx);

        let started = Instant::now();
        assert!(matches!(runner.step(), GameEvent::Tick));
        assert!(matches!(runner.step(), GameEvent::Tick));
        // paced by the interval rather than spinning
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn step_passes_keys_through_in_order() {
        let (tx, mut runner) = runner(1_000);
        tx.send(key_event('4')).unwrap();
        tx.send(GameEvent::Resize).unwrap();

        match runner.step() {
            GameEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('4')),
            other => panic!("expected key event, got {other:?}"),
        }
        assert!(matches!(runner.step(), GameEvent::Resize));
    }

    #[test]
    fn due_tick_is_not_starved_by_pending_keys() {
        let (tx, mut runner) = runner(20);
        tx.send(key_event('1')).unwrap();
        assert!(matches!(runner.step(), GameEvent::Key(_)));

        std::thread::sleep(Duration::from_millis(30));
        tx.send(key_event('2')).unwrap();

        assert!(matches!(runner.step(), GameEvent::Tick));
        match runner.step() {
            GameEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('2')),
            other => panic!("expected key event, got {other:?}"),
        }
    }
}
