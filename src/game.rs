use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::error::Result;
use crate::range::RangeConfig;

/// How a guess compares to the hidden target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

/// Owns the hidden target and the step counter for one range configuration.
///
/// A round starts implicitly on the first guess after creation, a reset, or
/// a won round. That first guess re-rolls the target.
#[derive(Debug)]
pub struct GameSession {
    range: RangeConfig,
    target: i64,
    steps: u32,
    active: bool,
    rng: StdRng,
}

impl GameSession {
    pub fn new(range: RangeConfig) -> Self {
        Self::with_rng(range, StdRng::from_entropy())
    }

    /// Reproducible draws for a given seed
    pub fn with_seed(range: RangeConfig, seed: u64) -> Self {
        Self::with_rng(range, StdRng::seed_from_u64(seed))
    }

    fn with_rng(range: RangeConfig, rng: StdRng) -> Self {
        let mut session = Self {
            range,
            target: range.min(),
            steps: 0,
            active: false,
            rng,
        };
        session.reset();
        session
    }

    /// Replace the bounds from raw integers and start over
    pub fn configure(&mut self, min: i64, max: i64) -> Result<()> {
        let range = RangeConfig::new(min, max)?;
        self.set_range(range);
        Ok(())
    }

    pub fn set_range(&mut self, range: RangeConfig) {
        self.range = range;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.target = self.rng.gen_range(self.range.min()..=self.range.max());
        self.steps = 0;
        self.active = false;
        debug!(range = %self.range, "target drawn");
    }

    pub fn guess(&mut self, n: i64) -> Comparison {
        if !self.active {
            self.reset();
            self.active = true;
        }
        self.steps += 1;

        if n > self.target {
            Comparison::Greater
        } else if n < self.target {
            Comparison::Less
        } else {
            self.active = false;
            Comparison::Equal
        }
    }

    pub fn range(&self) -> RangeConfig {
        self.range
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub(crate) fn target(&self) -> i64 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use assert_matches::assert_matches;

    fn range(min: i64, max: i64) -> RangeConfig {
        RangeConfig::new(min, max).unwrap()
    }

    /// Finds the target of the upcoming round by replaying the same seed
    fn next_round_target(seed: u64, r: RangeConfig) -> i64 {
        let mut probe = GameSession::with_seed(r, seed);
        probe.guess(r.min());
        probe.target()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::with_seed(range(1, 10), 7);
        assert_eq!(session.steps(), 0);
        assert!(!session.is_active());
        assert!(session.range().contains(session.target()));
    }

    #[test]
    fn test_reset_stays_in_bounds() {
        let r = range(-3, 3);
        let mut session = GameSession::with_seed(r, 42);
        for _ in 0..1_000 {
            session.reset();
            assert!(r.contains(session.target()));
        }
    }

    #[test]
    fn test_reset_is_not_endpoint_heavy() {
        let r = range(1, 10);
        let mut session = GameSession::with_seed(r, 1234);
        let mut counts = [0u32; 10];
        let draws = 10_000;
        for _ in 0..draws {
            session.reset();
            counts[(session.target() - 1) as usize] += 1;
        }
        // expectation is 1000 per bucket
        for count in counts {
            assert!((800..=1200).contains(&count), "bucket count {count}");
        }
    }

    #[test]
    fn test_guess_compares_against_target() {
        let r = range(1, 100);
        let target = next_round_target(9, r);
        let mut session = GameSession::with_seed(r, 9);

        if target > r.min() {
            assert_eq!(session.guess(target - 1), Comparison::Less);
        }
        if target < r.max() {
            assert_eq!(session.guess(target + 1), Comparison::Greater);
        }
        assert_eq!(session.guess(target), Comparison::Equal);
        assert!(!session.is_active());
    }

    #[test]
    fn test_guess_increments_steps_including_winning_guess() {
        let r = range(1, 2);
        let target = next_round_target(5, r);
        let miss = if target == 1 { 2 } else { 1 };
        let mut session = GameSession::with_seed(r, 5);

        session.guess(miss);
        assert_eq!(session.steps(), 1);
        assert!(session.is_active());

        session.guess(target);
        assert_eq!(session.steps(), 2);
        assert!(!session.is_active());
    }

    #[test]
    fn test_guess_is_total_over_out_of_range_values() {
        let mut session = GameSession::with_seed(range(1, 10), 3);
        assert_eq!(session.guess(i64::MIN), Comparison::Less);
        assert_eq!(session.guess(i64::MAX), Comparison::Greater);
        assert_eq!(session.steps(), 2);
    }

    #[test]
    fn test_guess_after_win_starts_a_new_round() {
        let r = range(1, 1_000_000);
        let target = next_round_target(11, r);
        let mut session = GameSession::with_seed(r, 11);

        assert_eq!(session.guess(target), Comparison::Equal);
        assert_eq!(session.steps(), 1);
        assert!(!session.is_active());

        // the winning value of the previous round starts a fresh one
        session.guess(target);
        assert_eq!(session.steps(), 1);
    }

    #[test]
    fn test_configure_validates_and_resets() {
        let mut session = GameSession::with_seed(range(1, 10), 21);
        session.guess(0);

        assert_matches!(session.configure(10, 1), Err(Error::InvalidRange { .. }));
        assert_eq!(session.range(), range(1, 10));
        assert!(session.is_active());

        session.configure(100, 200).unwrap();
        assert_eq!(session.range(), range(100, 200));
        assert_eq!(session.steps(), 0);
        assert!(!session.is_active());
        assert!(session.range().contains(session.target()));
    }
}
