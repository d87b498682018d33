//! SQLite leaderboard.
//!
//! Every call opens its own connection and drops it before returning, so the
//! store holds nothing but a path and several processes may share one file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, params};

use lightcycle_core::score_store::{HighScore, HighScoreStore, StoreError};
use lightcycle_core::time::unix_timestamp;

/// How long a call waits on a locked database before giving up. Calls are
/// synchronous and the arena makes one per finished round from the tick
/// task, so this is also the longest a round end can stall that task.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS leader_board (
    player_name TEXT PRIMARY KEY,
    score INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

/// High score store backed by a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteLeaderboard {
    path: PathBuf,
}

impl SqliteLeaderboard {
    /// Store backed by the file at `path`. Nothing is opened until the first
    /// call; the file and table are created on demand.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(query)?;
        Ok(conn)
    }
}

impl HighScoreStore for SqliteLeaderboard {
    fn store_high_score(&mut self, name: &str, score_delta: i32) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO leader_board (player_name, score, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(player_name) DO UPDATE SET
                 score = score + excluded.score,
                 updated_at = excluded.updated_at",
            params![name, score_delta, unix_timestamp()],
        )
        .map_err(query)?;
        tracing::debug!(name, score_delta, "High score stored");
        Ok(())
    }

    fn top_high_scores(&mut self, limit: usize) -> Result<Vec<HighScore>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT player_name, score FROM leader_board
                 ORDER BY score DESC, player_name ASC
                 LIMIT ?1",
            )
            .map_err(query)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(HighScore {
                    name: row.get(0)?,
                    total: row.get(1)?,
                })
            })
            .map_err(query)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM leader_board", []).map_err(query)?;
        tracing::info!(removed, "Leaderboard cleared");
        Ok(())
    }
}

fn unavailable(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn query(e: rusqlite::Error) -> StoreError {
    StoreError::Query(e.to_string())
}
