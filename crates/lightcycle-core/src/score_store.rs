use serde::{Deserialize, Serialize};

/// Default number of rows returned by a leaderboard query.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Persistence seam used by the arena when a round ends.
///
/// Implementations are free to open and close their backing connection on
/// every call. The arena never lets a failure here block the end of a round;
/// it logs the error and carries on.
pub trait HighScoreStore: Send {
    /// Add `score_delta` to the stored total for `name`, inserting a new row
    /// if the name has never been seen.
    fn store_high_score(&mut self, name: &str, score_delta: i32) -> Result<(), StoreError>;

    /// Up to `limit` entries ordered by total score, highest first.
    fn top_high_scores(&mut self, limit: usize) -> Result<Vec<HighScore>, StoreError>;

    /// Remove every stored score.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub name: String,
    pub total: i64,
}

/// Render entries as a numbered listing: `1. name: total`.
pub fn ranking_lines(scores: &[HighScore]) -> Vec<String> {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}: {}", i + 1, s.name, s.total))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or opened.
    Unavailable(String),
    /// The store was reachable but a statement failed.
    Query(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(m) => write!(f, "high score store unavailable: {m}"),
            Self::Query(m) => write!(f, "high score query failed: {m}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A store that accepts and forgets everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardScores;

impl HighScoreStore for DiscardScores {
    fn store_high_score(&mut self, name: &str, score_delta: i32) -> Result<(), StoreError> {
        tracing::trace!(name, score_delta, "Discarding high score");
        Ok(())
    }

    fn top_high_scores(&mut self, _limit: usize) -> Result<Vec<HighScore>, StoreError> {
        Ok(Vec::new())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
