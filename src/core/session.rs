use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::difficulty::{DifficultyConfig, TryLimit};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    InProgress,
    Won,
    Lost,
}

/// What one evaluated guess tells the player.
///
/// `game_over` is set on the wrong guess that spends the last try, and only
/// on that one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessOutcome {
    Correct {
        tries_used: u32,
    },
    TooLow {
        tries_used: u32,
        tries_remaining: TryLimit,
        game_over: bool,
    },
    TooHigh {
        tries_used: u32,
        tries_remaining: TryLimit,
        game_over: bool,
    },
}

impl GuessOutcome {
    /// True when this outcome ended the round.
    pub fn is_terminal(&self) -> bool {
        match self {
            GuessOutcome::Correct { .. } => true,
            GuessOutcome::TooLow { game_over, .. } | GuessOutcome::TooHigh { game_over, .. } => {
                *game_over
            }
        }
    }
}

/// One round of the guessing game.
///
/// The secret stays private for the whole round; [`GameSession::reveal`]
/// hands it out only once the round is decided.
pub struct GameSession {
    secret: u32,
    tries_used: u32,
    config: DifficultyConfig,
    state: SessionState,
}

impl GameSession {
    /// Start a round with a freshly drawn secret in `1..=upper_bound`.
    pub fn new(config: DifficultyConfig) -> Self {
        let secret = rand::rng().random_range(1..=config.upper_bound);
        Self::with_secret(config, secret)
    }

    /// Start a round with a fixed secret. Replay/test seam.
    pub fn with_secret(config: DifficultyConfig, secret: u32) -> Self {
        debug_assert!((1..=config.upper_bound).contains(&secret));
        Self {
            secret,
            tries_used: 0,
            config,
            state: SessionState::InProgress,
        }
    }

    /// Parse raw guess text. Failures here never consume a try.
    pub fn parse_guess(raw: &str) -> Result<i64, GameError> {
        raw.trim().parse().map_err(|_| GameError::InvalidGuess {
            input: raw.trim().to_string(),
        })
    }

    /// Parse and evaluate raw guess text in one step.
    pub fn submit(&mut self, raw: &str) -> Result<GuessOutcome, GameError> {
        let guess = Self::parse_guess(raw)?;
        self.evaluate_guess(guess)
    }

    /// Evaluate one guess. Every call on a live round costs exactly one try.
    pub fn evaluate_guess(&mut self, guess: i64) -> Result<GuessOutcome, GameError> {
        if self.state != SessionState::InProgress {
            return Err(GameError::SessionClosed);
        }
        self.tries_used += 1;

        let secret = i64::from(self.secret);
        if guess == secret {
            self.state = SessionState::Won;
            debug!(tries = self.tries_used, "round won");
            return Ok(GuessOutcome::Correct {
                tries_used: self.tries_used,
            });
        }

        let game_over = self.config.max_tries.exhausted_by(self.tries_used);
        if game_over {
            self.state = SessionState::Lost;
            debug!(tries = self.tries_used, "out of tries");
        }
        let tries_remaining = self.config.max_tries.remaining(self.tries_used);

        Ok(if guess < secret {
            GuessOutcome::TooLow {
                tries_used: self.tries_used,
                tries_remaining,
                game_over,
            }
        } else {
            GuessOutcome::TooHigh {
                tries_used: self.tries_used,
                tries_remaining,
                game_over,
            }
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tries_used(&self) -> u32 {
        self.tries_used
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// The secret, once the round is over. `None` while still playing.
    pub fn reveal(&self) -> Option<u32> {
        match self.state {
            SessionState::InProgress => None,
            SessionState::Won | SessionState::Lost => Some(self.secret),
        }
    }
}
