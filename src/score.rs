use crate::error::{Error, Result};
use crate::range::RangeConfig;

/// Points for a finished round: wider ranges solved in fewer steps and less
/// time score higher.
pub fn score(min: i64, max: i64, steps: u32, elapsed_secs: f64) -> Result<f64> {
    let denominator = elapsed_secs + f64::from(steps);
    if denominator <= 0.0 || !denominator.is_finite() {
        return Err(Error::DivisionGuard);
    }
    Ok((max as f64 - min as f64) / denominator * 1000.0)
}

pub fn score_for(range: RangeConfig, steps: u32, elapsed_secs: f64) -> Result<f64> {
    score(range.min(), range.max(), steps, elapsed_secs)
}

/// Scores are stored with full precision and shown as whole numbers
pub fn display_score(score: f64) -> i64 {
    score.round() as i64
}
