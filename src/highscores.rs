//! High score persistence
//!
//! The engine only needs a single best score: loaded when a session is built,
//! saved whenever a finished match beats it.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Key-value store for the best score
pub trait HighScoreStore {
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// In-memory store; clones share the same saved history
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    saved: Rc<RefCell<Vec<u64>>>,
    initial: u64,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports `score` until something is saved
    pub fn with_score(score: u64) -> Self {
        Self {
            saved: Rc::default(),
            initial: score,
        }
    }

    /// Every value saved so far, oldest first
    pub fn saves(&self) -> Vec<u64> {
        self.saved.borrow().clone()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_high_score(&self) -> u64 {
        self.saved.borrow().last().copied().unwrap_or(self.initial)
    }

    fn save_high_score(&mut self, score: u64) {
        self.saved.borrow_mut().push(score);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load_high_score(&self) -> u64 {
        let loaded = std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str::<HighScoreFile>(&json).ok());
        match loaded {
            Some(file) => {
                log::info!("Loaded high score {}", file.high_score);
                file.high_score
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        let json = match serde_json::to_string(&HighScoreFile { high_score: score }) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode high score: {}", e);
                return;
            }
        };
        match std::fs::write(&self.path, json) {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::warn!("Could not save high score to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shares_history() {
        let store = MemoryHighScoreStore::with_score(120);
        let mut handle = store.clone();
        assert_eq!(store.load_high_score(), 120);
        handle.save_high_score(300);
        assert_eq!(store.load_high_score(), 300);
        assert_eq!(store.saves(), vec![300]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("maze_chase_hs_{}.json", std::process::id()));
        let mut store = JsonFileHighScoreStore::new(&path);
        store.save_high_score(4410);
        assert_eq!(JsonFileHighScoreStore::new(&path).load_high_score(), 4410);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_missing_or_corrupt_is_zero() {
        let path = std::env::temp_dir().join(format!("maze_chase_bad_{}.json", std::process::id()));
        assert_eq!(JsonFileHighScoreStore::new(&path).load_high_score(), 0);
        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(JsonFileHighScoreStore::new(&path).load_high_score(), 0);
        let _ = std::fs::remove_file(&path);
    }
}
