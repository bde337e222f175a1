//! High score persistence
//!
//! Stores serialize the leaderboard as JSON:
//! - `JsonFileStore`: a file on disk, written via tmp file and rename
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

use crate::highscores::HighScores;
use crate::{PacmanError, Result};

/// LocalStorage key / default file stem
pub const STORAGE_KEY: &str = "pacman_highscores";

/// Somewhere the leaderboard can live between sessions
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<HighScores>>;
    fn save(&mut self, scores: &HighScores) -> Result<()>;
}

/// Keeps the serialized leaderboard in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    fail: bool,
}

impl MemoryStore {
    /// Pre-seeded with raw JSON
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            fail: false,
        }
    }

    /// Every operation fails, like a browser with storage disabled
    pub fn failing() -> Self {
        Self {
            json: None,
            fail: true,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<HighScores>> {
        if self.fail {
            return Err(PacmanError::Storage("memory store unavailable".into()));
        }
        match &self.json {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, scores: &HighScores) -> Result<()> {
        if self.fail {
            return Err(PacmanError::Storage("memory store unavailable".into()));
        }
        self.json = Some(serde_json::to_string(scores)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::ScoreStore;
    use crate::Result;
    use crate::highscores::HighScores;

    /// Leaderboard in a JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl ScoreStore for JsonFileStore {
        fn load(&self) -> Result<Option<HighScores>> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&mut self, scores: &HighScores) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let json = serde_json::to_string_pretty(scores)?;
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{STORAGE_KEY, ScoreStore};
    use crate::highscores::HighScores;
    use crate::{PacmanError, Result};

    /// Leaderboard in the browser's LocalStorage
    #[derive(Debug, Clone)]
    pub struct LocalStorageStore {
        key: String,
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self {
                key: STORAGE_KEY.to_string(),
            }
        }
    }

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| PacmanError::Storage("LocalStorage unavailable".into()))
        }
    }

    impl ScoreStore for LocalStorageStore {
        fn load(&self) -> Result<Option<HighScores>> {
            let storage = Self::storage()?;
            let json = storage
                .get_item(&self.key)
                .map_err(|e| PacmanError::Storage(format!("{e:?}")))?;
            match json {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        }

        fn save(&mut self, scores: &HighScores) -> Result<()> {
            let storage = Self::storage()?;
            let json = serde_json::to_string(scores)?;
            storage
                .set_item(&self.key, &json)
                .map_err(|e| PacmanError::Storage(format!("{e:?}")))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_empty_then_saved() {
        let mut store = MemoryStore::default();
        assert!(store.load().unwrap().is_none());

        let mut scores = HighScores::new();
        scores.add_score(400, 1, 0.0);
        store.save(&scores).unwrap();
        assert!(store.raw().unwrap().contains("400"));
        assert_eq!(store.load().unwrap(), Some(scores));
    }

    #[test]
    fn test_memory_store_corrupt_json() {
        let store = MemoryStore::with_json("{not json");
        assert!(matches!(store.load(), Err(PacmanError::Serde(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("scores.json"));
        assert!(store.load().unwrap().is_none());

        let mut scores = HighScores::new();
        scores.add_score(2_500, 3, 42.0);
        store.save(&scores).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(scores));
    }
}
