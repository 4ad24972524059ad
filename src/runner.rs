use tracing::warn;

use crate::core::difficulty::DifficultyConfig;
use crate::core::scoring;
use crate::core::session::{GameSession, GuessOutcome, SessionState};
use crate::error::GameError;
use crate::store::ScoreStore;

/// What callers show while the scoreboard is still empty.
pub const DEFAULT_HIGH_SCORE: (u32, &str) = (0, "Anonymous");

/// Drives one play-through: a session plus the scoreboard handle.
///
/// The session and scoring logic know nothing about persistence; every store
/// access goes through here.
pub struct GameRunner<'a> {
    store: &'a ScoreStore,
    session: GameSession,
}

impl<'a> GameRunner<'a> {
    pub fn new(store: &'a ScoreStore, config: DifficultyConfig) -> Self {
        Self {
            store,
            session: GameSession::new(config),
        }
    }

    /// Runner over a pre-built session (fixed secrets in tests).
    pub fn with_session(store: &'a ScoreStore, session: GameSession) -> Self {
        Self { store, session }
    }

    /// Parse and evaluate one guess.
    pub fn submit(&mut self, raw: &str) -> Result<GuessOutcome, GameError> {
        self.session.submit(raw)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// The round's score, once it is won. Lost and unfinished rounds have none.
    pub fn final_score(&self) -> Option<u32> {
        match self.session.state() {
            SessionState::Won => Some(scoring::score(self.session.tries_used())),
            SessionState::InProgress | SessionState::Lost => None,
        }
    }

    /// Persist the score of a won round under `username`.
    ///
    /// Returns the saved score, or `Ok(None)` when there is nothing to save.
    /// Store failures bubble up; the round's outcome stands either way.
    pub async fn save_score(&self, username: &str) -> Result<Option<u32>, GameError> {
        let Some(score) = self.final_score() else {
            warn!("no score to save for an unfinished or lost round");
            return Ok(None);
        };
        self.store.insert(username, score).await?;
        Ok(Some(score))
    }

    /// Current best score, with the empty-board default applied.
    pub async fn best_score(&self) -> Result<(u32, String), GameError> {
        best_score(self.store).await
    }

    /// Play again: the old session is discarded wholesale.
    pub fn restart(&mut self, config: DifficultyConfig) {
        self.session = GameSession::new(config);
    }
}

/// Best score on the board, or `(0, "Anonymous")` while it is empty.
pub async fn best_score(store: &ScoreStore) -> Result<(u32, String), GameError> {
    Ok(match store.highest_score().await? {
        Some(record) => (record.score as u32, record.username),
        None => (DEFAULT_HIGH_SCORE.0, DEFAULT_HIGH_SCORE.1.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::difficulty::{Level, TryLimit};

    fn config(range: u32, tries: u32) -> DifficultyConfig {
        DifficultyConfig::resolve(Level::Custom, Some(range), Some(tries)).unwrap()
    }

    #[tokio::test]
    async fn a_winning_run_is_scored_and_persisted() {
        let store = ScoreStore::memory().await.unwrap();
        let session = GameSession::with_secret(config(10, 3), 7);
        let mut runner = GameRunner::with_session(&store, session);

        assert_eq!(
            runner.submit("3").unwrap(),
            GuessOutcome::TooLow {
                tries_used: 1,
                tries_remaining: TryLimit::Finite(2),
                game_over: false,
            }
        );
        assert_eq!(
            runner.submit("9").unwrap(),
            GuessOutcome::TooHigh {
                tries_used: 2,
                tries_remaining: TryLimit::Finite(1),
                game_over: false,
            }
        );
        assert_eq!(
            runner.submit("7").unwrap(),
            GuessOutcome::Correct { tries_used: 3 }
        );

        assert_eq!(runner.final_score(), Some(700));
        assert_eq!(runner.save_score("alice").await.unwrap(), Some(700));
        assert_eq!(runner.best_score().await.unwrap(), (700, "alice".to_string()));
    }

    #[tokio::test]
    async fn a_lost_run_is_never_persisted() {
        let store = ScoreStore::memory().await.unwrap();
        let session = GameSession::with_secret(config(10, 3), 7);
        let mut runner = GameRunner::with_session(&store, session);

        runner.submit("1").unwrap();
        runner.submit("2").unwrap();
        let last = runner.submit("3").unwrap();
        assert!(last.is_terminal());
        assert_eq!(runner.session().state(), SessionState::Lost);

        assert_eq!(runner.final_score(), None);
        assert_eq!(runner.save_score("alice").await.unwrap(), None);
        assert!(store.highest_score().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn the_default_best_score_is_anonymous_zero() {
        let store = ScoreStore::memory().await.unwrap();
        let runner = GameRunner::new(&store, config(10, 3));
        assert_eq!(
            runner.best_score().await.unwrap(),
            (0, "Anonymous".to_string())
        );
    }

    #[tokio::test]
    async fn restarting_discards_the_old_session() {
        let store = ScoreStore::memory().await.unwrap();
        let session = GameSession::with_secret(config(10, 3), 7);
        let mut runner = GameRunner::with_session(&store, session);

        runner.submit("7").unwrap();
        assert_eq!(runner.session().state(), SessionState::Won);

        runner.restart(config(20, 5));
        assert_eq!(runner.session().state(), SessionState::InProgress);
        assert_eq!(runner.session().tries_used(), 0);
        assert_eq!(runner.session().config().upper_bound, 20);
        assert_eq!(runner.final_score(), None);
    }
}
