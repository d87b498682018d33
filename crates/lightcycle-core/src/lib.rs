pub mod color;
pub mod score_store;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::score_store::{HighScore, HighScoreStore, StoreError};

    /// In-memory store that records every call so tests can inspect them
    /// after the store has been moved into an arena.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingStore {
        calls: Arc<Mutex<Vec<(String, i32)>>>,
    }

    impl RecordingStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every `store_high_score` call seen so far, in order.
        pub fn calls(&self) -> Vec<(String, i32)> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    impl HighScoreStore for RecordingStore {
        fn store_high_score(&mut self, name: &str, score_delta: i32) -> Result<(), StoreError> {
            self.calls
                .lock()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .push((name.to_string(), score_delta));
            Ok(())
        }

        fn top_high_scores(&mut self, limit: usize) -> Result<Vec<HighScore>, StoreError> {
            let calls = self
                .calls
                .lock()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            let mut totals: HashMap<&str, i64> = HashMap::new();
            for (name, delta) in calls.iter() {
                *totals.entry(name.as_str()).or_insert(0) += i64::from(*delta);
            }
            let mut scores: Vec<HighScore> = totals
                .into_iter()
                .map(|(name, total)| HighScore {
                    name: name.to_string(),
                    total,
                })
                .collect();
            scores.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
            scores.truncate(limit);
            Ok(scores)
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            self.calls
                .lock()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .clear();
            Ok(())
        }
    }

    /// Store whose backing connection is never reachable.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn store_high_score(&mut self, _name: &str, _score_delta: i32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("test store is offline".to_string()))
        }

        fn top_high_scores(&mut self, _limit: usize) -> Result<Vec<HighScore>, StoreError> {
            Err(StoreError::Unavailable("test store is offline".to_string()))
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("test store is offline".to_string()))
        }
    }

}
