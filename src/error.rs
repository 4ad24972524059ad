use thiserror::Error;

/// Everything that can go wrong between a keypress and the scoreboard.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid difficulty: {reason}")]
    InvalidConfig { reason: String },
    #[error("not a whole number: {input:?}")]
    InvalidGuess { input: String },
    #[error("the round is already over")]
    SessionClosed,
    #[error("cannot record score: {reason}")]
    InvalidRecord { reason: String },
    #[error("score store unavailable")]
    StoreUnavailable {
        #[from]
        source: sqlx::Error,
    },
}
