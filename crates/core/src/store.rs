//! High-score persistence boundary.
//!
//! The session asks for the high score once at construction and offers an
//! improved score once at game over; everything about where and how the
//! value lives belongs to the implementation behind [`ScoreStore`].
//! Persistence failures are never fatal to a session: the caller recovers
//! with a zero score or skips the save.

use anyhow::Result;

/// Loads and saves the single best-score integer.
pub trait ScoreStore {
    /// Read the stored high score.
    fn load(&mut self) -> Result<u32>;
    /// Persist a new high score.
    fn save(&mut self, score: u32) -> Result<()>;
}

/// In-memory store, for tests and score-keeping-free sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    best: u32,
}

impl MemoryStore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.best)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.best = score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), 0);
        store.save(1200).unwrap();
        assert_eq!(store.load().unwrap(), 1200);
    }
}
