use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: i64, max: i64 },

    #[error("invalid range bound: {0:?}")]
    InvalidBound(String),

    #[error("invalid guess: {0:?}")]
    InvalidGuess(String),

    #[error("score is undefined for a round with no steps and no elapsed time")]
    DivisionGuard,

    #[error("storage error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Validation errors are shown to the player; everything else is a failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidRange { .. } | Error::InvalidBound(_) | Error::InvalidGuess(_)
        )
    }
}
