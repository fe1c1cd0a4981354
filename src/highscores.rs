//! High score record
//!
//! A single best score persisted across sessions as a plain integer string.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key for the record
    pub const STORAGE_KEY: &'static str = "pixelMuncherHighScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a score would replace the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Replace the record if `score` beats it. Returns true when it changed.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from storage. Missing or unparseable values count as zero.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get(Self::STORAGE_KEY) else {
            log::info!("No high score found, starting fresh");
            return Self::default();
        };

        match raw.trim().parse::<u64>() {
            Ok(best) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Err(_) => {
                log::warn!("Stored high score {:?} is not a number, using 0", raw);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(Self::STORAGE_KEY, &self.best.to_string());
        log::info!("High score saved ({})", self.best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_and_invalid_are_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);

        store.set(HighScore::STORAGE_KEY, "lots");
        assert_eq!(HighScore::load(&store).best, 0);

        store.set(HighScore::STORAGE_KEY, "-5");
        assert_eq!(HighScore::load(&store).best, 0);

        store.set(HighScore::STORAGE_KEY, " 840 ");
        assert_eq!(HighScore::load(&store).best, 840);
    }

    #[test]
    fn test_submit_only_on_improvement() {
        let mut high = HighScore::new(500);
        assert!(!high.submit(400));
        assert!(!high.submit(500));
        assert_eq!(high.best, 500);

        assert!(high.submit(510));
        assert!(!high.submit(510));
        assert_eq!(high.best, 510);

        let mut store = MemoryStore::new();
        high.save(&mut store);
        assert_eq!(HighScore::load(&store).best, 510);
    }

    #[test]
    fn test_zero_never_qualifies_against_zero() {
        let high = HighScore::default();
        assert!(!high.qualifies(0));
        assert!(high.qualifies(10));
    }
}
