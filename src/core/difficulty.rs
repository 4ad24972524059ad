use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;

/// Difficulty selection, either a preset or a player-supplied range/tries pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Easy,
    Medium,
    Hard,
    Custom,
}

/// Try budget for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TryLimit {
    Finite(u32),
    Unlimited,
}

impl TryLimit {
    /// Tries left after `used` evaluations. Saturates at zero.
    pub fn remaining(self, used: u32) -> TryLimit {
        match self {
            TryLimit::Finite(max) => TryLimit::Finite(max.saturating_sub(used)),
            TryLimit::Unlimited => TryLimit::Unlimited,
        }
    }

    pub fn exhausted_by(self, used: u32) -> bool {
        matches!(self, TryLimit::Finite(max) if used >= max)
    }
}

impl fmt::Display for TryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryLimit::Finite(n) => write!(f, "{}", n),
            TryLimit::Unlimited => write!(f, "∞"),
        }
    }
}

/// Settings for one round: the secret is drawn from `1..=upper_bound`,
/// and the round allows `max_tries` guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub upper_bound: u32,
    pub max_tries: TryLimit,
}

impl DifficultyConfig {
    /// Turn a level selection into concrete settings.
    ///
    /// Presets ignore the custom values. `Level::Custom` needs both an upper
    /// limit and a try budget, each at least 1.
    pub fn resolve(
        level: Level,
        custom_range: Option<u32>,
        custom_tries: Option<u32>,
    ) -> Result<Self, GameError> {
        let (upper_bound, max_tries) = match level {
            Level::Easy => (100, TryLimit::Unlimited),
            Level::Medium => (100, TryLimit::Finite(10)),
            Level::Hard => (100, TryLimit::Finite(5)),
            Level::Custom => {
                let range = custom_range.ok_or_else(|| invalid("custom level needs an upper limit"))?;
                let tries = custom_tries.ok_or_else(|| invalid("custom level needs a try budget"))?;
                if range == 0 {
                    return Err(invalid("upper limit must be at least 1"));
                }
                if tries == 0 {
                    return Err(invalid("try budget must be at least 1"));
                }
                (range, TryLimit::Finite(tries))
            }
        };
        Ok(Self {
            upper_bound,
            max_tries,
        })
    }
}

fn invalid(reason: &str) -> GameError {
    GameError::InvalidConfig {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_the_level_table() {
        let easy = DifficultyConfig::resolve(Level::Easy, None, None).unwrap();
        assert_eq!(easy.upper_bound, 100);
        assert_eq!(easy.max_tries, TryLimit::Unlimited);

        let medium = DifficultyConfig::resolve(Level::Medium, None, None).unwrap();
        assert_eq!(medium.max_tries, TryLimit::Finite(10));

        let hard = DifficultyConfig::resolve(Level::Hard, None, None).unwrap();
        assert_eq!(hard.max_tries, TryLimit::Finite(5));
    }

    #[test]
    fn custom_levels_take_both_values() {
        let config = DifficultyConfig::resolve(Level::Custom, Some(500), Some(12)).unwrap();
        assert_eq!(config.upper_bound, 500);
        assert_eq!(config.max_tries, TryLimit::Finite(12));
    }

    #[test]
    fn custom_levels_reject_missing_values() {
        assert!(matches!(
            DifficultyConfig::resolve(Level::Custom, Some(100), None),
            Err(GameError::InvalidConfig { .. })
        ));
        assert!(matches!(
            DifficultyConfig::resolve(Level::Custom, None, Some(10)),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn custom_levels_reject_zero() {
        assert!(matches!(
            DifficultyConfig::resolve(Level::Custom, Some(0), Some(10)),
            Err(GameError::InvalidConfig { .. })
        ));
        assert!(matches!(
            DifficultyConfig::resolve(Level::Custom, Some(100), Some(0)),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn try_limits_count_down_and_exhaust() {
        let limit = TryLimit::Finite(3);
        assert_eq!(limit.remaining(1), TryLimit::Finite(2));
        assert_eq!(limit.remaining(5), TryLimit::Finite(0));
        assert!(!limit.exhausted_by(2));
        assert!(limit.exhausted_by(3));

        assert_eq!(TryLimit::Unlimited.remaining(1_000), TryLimit::Unlimited);
        assert!(!TryLimit::Unlimited.exhausted_by(u32::MAX));
    }

    #[test]
    fn try_limits_render_for_the_ui() {
        assert_eq!(TryLimit::Finite(4).to_string(), "4");
        assert_eq!(TryLimit::Unlimited.to_string(), "∞");
    }
}
