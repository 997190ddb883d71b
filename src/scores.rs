use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

const HIGH_SCORE_KEY: &str = "starCatcherHighScore";
const SCORES_FILE: &str = "star-catcher.scores";

/// Minimal string key-value storage. Writes are best-effort.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Key-value pairs kept as a JSON object in a single file.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_file(&path);
        FileStore { path, entries }
    }

    pub fn default_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(SCORES_FILE);
            }
        }
        PathBuf::from(SCORES_FILE)
    }

    fn read_file(path: &Path) -> BTreeMap<String, String> {
        let Ok(data) = fs::read_to_string(path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("ignoring malformed score file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn write_file(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("could not encode scores: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!("could not save scores to {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.write_file();
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// The best score ever reached, read once and written on every new record.
pub struct HighScores {
    best: u32,
    store: Box<dyn KeyValueStore>,
}

impl HighScores {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let best = store
            .get(HIGH_SCORE_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        HighScores { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Raise the record if `score` beats it. Returns true when it did.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.store.set(HIGH_SCORE_KEY, &score.to_string());
        debug!("new high score {}", score);
        true
    }
}
