use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for the stopwatch
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for tests. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

pub type Observer = Box<dyn FnMut(Duration)>;

/// Wall-clock stopwatch that can be paused and resumed.
///
/// Elapsed time is always derived from clock instants, never from tick
/// counts, so missed ticks only delay notifications.
pub struct ElapsedTimer {
    clock: Box<dyn Clock>,
    anchor: Option<Instant>,
    accumulated: Duration,
    observer: Option<Observer>,
    last_notified_secs: Option<u64>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            anchor: None,
            accumulated: Duration::ZERO,
            observer: None,
            last_notified_secs: None,
        }
    }

    /// Receives `current()` once per whole second while running, and zero on reset
    pub fn set_observer(&mut self, observer: impl FnMut(Duration) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.anchor = Some(self.clock.now());
        self.last_notified_secs = Some(self.accumulated.as_secs());
    }

    pub fn stop(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            self.accumulated += self.clock.now().saturating_duration_since(anchor);
        }
        self.last_notified_secs = None;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.accumulated = Duration::ZERO;
        self.notify(Duration::ZERO);
    }

    pub fn current(&self) -> Duration {
        match self.anchor {
            Some(anchor) => self.accumulated + self.clock.now().saturating_duration_since(anchor),
            None => self.accumulated,
        }
    }

    /// Host scheduler hook. Safe to call at any rate, including not at all.
    pub fn on_tick(&mut self) {
        if !self.is_running() {
            return;
        }
        let current = self.current();
        let secs = current.as_secs();
        if self.last_notified_secs != Some(secs) {
            self.last_notified_secs = Some(secs);
            self.notify(current);
        }
    }

    fn notify(&mut self, elapsed: Duration) {
        if let Some(observer) = self.observer.as_mut() {
            observer(elapsed);
        }
    }
}

impl Default for ElapsedTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElapsedTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElapsedTimer")
            .field("anchor", &self.anchor)
            .field("accumulated", &self.accumulated)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn manual_timer() -> (ElapsedTimer, ManualClock) {
        let clock = ManualClock::new();
        (ElapsedTimer::with_clock(Box::new(clock.clone())), clock)
    }

    fn recording(timer: &mut ElapsedTimer) -> Rc<RefCell<Vec<Duration>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        timer.set_observer(move |d| sink.borrow_mut().push(d));
        seen
    }

    #[test]
    fn test_new_timer_is_idle_at_zero() {
        let (timer, _clock) = manual_timer();
        assert!(!timer.is_running());
        assert_eq!(timer.current(), Duration::ZERO);
    }

    #[test]
    fn test_current_advances_while_running() {
        let (mut timer, clock) = manual_timer();
        timer.start();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(timer.current(), Duration::from_millis(1500));

        let before = timer.current();
        clock.advance(Duration::from_millis(10));
        assert!(timer.current() >= before);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut timer, clock) = manual_timer();
        timer.start();
        clock.advance(Duration::from_secs(2));
        timer.start();
        clock.advance(Duration::from_secs(1));
        assert_eq!(timer.current(), Duration::from_secs(3));
    }

    #[test]
    fn test_stop_freezes_and_resume_accumulates() {
        let (mut timer, clock) = manual_timer();
        timer.start();
        clock.advance(Duration::from_secs(4));
        timer.stop();
        timer.stop();

        clock.advance(Duration::from_secs(10));
        assert_eq!(timer.current(), Duration::from_secs(4));
        assert!(!timer.is_running());

        timer.start();
        clock.advance(Duration::from_secs(1));
        assert_eq!(timer.current(), Duration::from_secs(5));
    }

    #[test]
    fn test_reset_zeroes_and_notifies() {
        let (mut timer, clock) = manual_timer();
        let seen = recording(&mut timer);

        timer.start();
        clock.advance(Duration::from_secs(3));
        timer.reset();

        assert_eq!(timer.current(), Duration::ZERO);
        assert!(!timer.is_running());
        assert_eq!(seen.borrow().last(), Some(&Duration::ZERO));
    }

    #[test]
    fn test_on_tick_notifies_once_per_whole_second() {
        let (mut timer, clock) = manual_timer();
        let seen = recording(&mut timer);
        timer.start();

        for _ in 0..25 {
            clock.advance(Duration::from_millis(100));
            timer.on_tick();
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].as_secs(), 1);
        assert_eq!(seen[1].as_secs(), 2);
    }

    #[test]
    fn test_skipped_ticks_do_not_affect_current() {
        let (mut timer, clock) = manual_timer();
        let seen = recording(&mut timer);
        timer.start();

        clock.advance(Duration::from_secs(7));
        timer.on_tick();

        assert_eq!(seen.borrow().as_slice(), &[Duration::from_secs(7)]);
        assert_eq!(timer.current(), Duration::from_secs(7));
    }

    #[test]
    fn test_no_notifications_after_stop() {
        let (mut timer, clock) = manual_timer();
        let seen = recording(&mut timer);
        timer.start();
        clock.advance(Duration::from_millis(900));
        timer.stop();

        clock.advance(Duration::from_secs(5));
        timer.on_tick();
        timer.on_tick();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_system_clock_timer_runs() {
        let mut timer = ElapsedTimer::new();
        timer.start();
        std::thread::sleep(Duration::from_millis(5));
        timer.stop();
        let frozen = timer.current();
        assert!(frozen >= Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.current(), frozen);
    }
}
