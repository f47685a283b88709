use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive bounds a target is drawn from. Always `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct RangeConfig {
    min: i64,
    max: i64,
}

#[derive(Deserialize)]
struct RawRange {
    min: i64,
    max: i64,
}

impl TryFrom<RawRange> for RangeConfig {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        RangeConfig::new(raw.min, raw.max)
    }
}

impl RangeConfig {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min >= max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Parse two raw form values. Both must be whole numbers.
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        Self::new(parse_bound(min)?, parse_bound(max)?)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Width of the range as used by scoring (`max - min`)
    pub fn span(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    pub fn contains(&self, n: i64) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Difficulty::default().range()
    }
}

impl std::fmt::Display for RangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

fn parse_bound(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidBound(raw.to_string()))
}

/// Preset ranges offered by the menu and the `--difficulty` flag
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn range(&self) -> RangeConfig {
        let max = match self {
            Difficulty::Easy => 100,
            Difficulty::Normal => 1_000,
            Difficulty::Hard => 10_000,
        };
        RangeConfig { min: 1, max }
    }
}
