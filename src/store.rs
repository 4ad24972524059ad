use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::error::GameError;

/// One row of the scoreboard. Rows are append-only; nothing updates or
/// deletes them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScoreRecord {
    pub id: i64,
    pub username: String,
    pub score: i64,
    pub created_at: NaiveDateTime,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    score INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Sqlite-backed scoreboard.
///
/// WAL journal mode, and the table is created on connect if it is missing —
/// there is no other migration story.
pub struct ScoreStore {
    pool: SqlitePool,
}

impl ScoreStore {
    /// Open (or create) the database behind `url`, e.g. `sqlite:scores.db`.
    pub async fn connect(url: &str) -> Result<Self, GameError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        info!(url, "score store ready");
        Ok(store)
    }

    /// Ephemeral store for tests and dry runs. Capped to a single connection
    /// so the in-memory database lives as long as the pool.
    pub async fn memory() -> Result<Self, GameError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), GameError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Append one score row. The timestamp is assigned by the database.
    pub async fn insert(&self, username: &str, score: u32) -> Result<(), GameError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GameError::InvalidRecord {
                reason: "username must not be empty".to_string(),
            });
        }
        sqlx::query("INSERT INTO scores (username, score) VALUES (?, ?)")
            .bind(username)
            .bind(i64::from(score))
            .execute(&self.pool)
            .await?;
        info!(username, score, "score recorded");
        Ok(())
    }

    /// The single best row, or `None` while the board is empty. Ties go to
    /// the earliest inserted record.
    pub async fn highest_score(&self) -> Result<Option<ScoreRecord>, GameError> {
        let best = sqlx::query_as::<_, ScoreRecord>(
            "SELECT id, username, score, created_at FROM scores ORDER BY score DESC, id ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn an_empty_board_has_no_best_score() {
        let store = ScoreStore::memory().await.unwrap();
        assert!(store.highest_score().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn the_best_score_is_the_maximum() {
        let store = ScoreStore::memory().await.unwrap();
        store.insert("alice", 700).await.unwrap();
        store.insert("bob", 900).await.unwrap();

        let best = store.highest_score().await.unwrap().unwrap();
        assert_eq!(best.score, 900);
        assert_eq!(best.username, "bob");
    }

    #[tokio::test]
    async fn ties_go_to_the_earliest_record() {
        let store = ScoreStore::memory().await.unwrap();
        store.insert("alice", 900).await.unwrap();
        store.insert("bob", 900).await.unwrap();

        let best = store.highest_score().await.unwrap().unwrap();
        assert_eq!(best.username, "alice");
    }

    #[tokio::test]
    async fn blank_usernames_are_rejected() {
        let store = ScoreStore::memory().await.unwrap();
        assert!(matches!(
            store.insert("   ", 500).await,
            Err(GameError::InvalidRecord { .. })
        ));
        assert!(store.highest_score().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn usernames_are_trimmed_on_insert() {
        let store = ScoreStore::memory().await.unwrap();
        store.insert("  carol  ", 300).await.unwrap();
        let best = store.highest_score().await.unwrap().unwrap();
        assert_eq!(best.username, "carol");
    }
}
