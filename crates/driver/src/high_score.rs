//! High-score persistence.
//!
//! The engine only keeps the best score for the running session; a store
//! carries it across sessions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub trait HighScoreStore: Send {
    /// Best score recorded so far (0 when nothing is stored)
    fn load(&mut self) -> Result<u32>;

    /// Record `score` as the new best
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Keeps the score for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.best)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.best = self.best.max(score);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighScoreFile {
    high_score: u32,
}

/// `{"highScore": n}` in a small JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(anyhow!(
                    "high score: read {} failed: {}",
                    self.path.display(),
                    e
                ))
            }
        };
        let file: HighScoreFile = serde_json::from_str(&text).map_err(|e| {
            anyhow!("high score: invalid file {}: {}", self.path.display(), e)
        })?;
        Ok(file.high_score)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        let json = serde_json::to_string(&HighScoreFile { high_score: score })?;
        fs::write(&self.path, json)
            .map_err(|e| anyhow!("high score: write {} failed: {}", self.path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tetrion-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn memory_store_keeps_best() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), 0);
        store.save(500).unwrap();
        store.save(200).unwrap();
        assert_eq!(store.load().unwrap(), 500);
    }

    #[test]
    fn file_store_round_trips_and_defaults_to_zero() {
        let path = temp_path("hs-roundtrip");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);

        store.save(1200).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"highScore":1200}"#);
        assert_eq!(FileStore::new(&path).load().unwrap(), 1200);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("hs-corrupt");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(err.to_string().starts_with("high score: invalid file"));

        let _ = fs::remove_file(&path);
    }
}
