//! High-score list - bounded, best first
//!
//! The engine keeps the list in memory only. It serializes as a plain JSON
//! array of scores so whatever store the frontend uses can persist it; a
//! restored list goes back into a session through `Session::with_high_scores`.
//! Capacity is always clamped to `1..=MAX_HIGH_SCORE_CAPACITY`.

use serde::{Deserialize, Serialize};

use crate::types::{HIGH_SCORE_CAPACITY, MAX_HIGH_SCORE_CAPACITY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct HighScores {
    scores: Vec<u32>,
    capacity: usize,
}

impl From<Vec<u32>> for HighScores {
    fn from(scores: Vec<u32>) -> Self {
        // Keep every persisted entry; the session re-bounds on restore.
        let capacity = scores.len().max(HIGH_SCORE_CAPACITY);
        Self::from_scores(capacity, scores)
    }
}

impl From<HighScores> for Vec<u32> {
    fn from(list: HighScores) -> Self {
        list.scores
    }
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HIGH_SCORE_CAPACITY);
        Self {
            scores: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from a previously persisted list (any order)
    pub fn from_scores(capacity: usize, scores: impl IntoIterator<Item = u32>) -> Self {
        let mut list = Self::new(capacity);
        for score in scores {
            list.record(score);
        }
        list
    }

    /// Insert a final score. Returns its 0-based rank, or None if it did not
    /// make the list.
    pub fn record(&mut self, score: u32) -> Option<usize> {
        // Ties rank below existing entries.
        let rank = self.scores.partition_point(|&s| s >= score);
        if rank >= self.capacity {
            return None;
        }
        self.scores.insert(rank, score);
        self.scores.truncate(self.capacity);
        Some(rank)
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn best(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(HIGH_SCORE_CAPACITY)
    }
}
