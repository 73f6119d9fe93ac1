//! Best and last score bookkeeping
//!
//! Persisted to LocalStorage in the browser and to a small JSON file natively.

use serde::{Deserialize, Serialize};

/// Scores derived from finished episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreBook {
    /// Highest score of any finished episode
    pub best: u64,
    /// Score of the most recently finished episode
    pub last: u64,
}

impl ScoreBook {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "coin_lander_scores";

    /// File name next to the working directory (native only)
    #[allow(dead_code)]
    const FILE_NAME: &'static str = "coin_lander_scores.json";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished episode; returns true on a new best
    pub fn record(&mut self, score: u64) -> bool {
        self.last = score;
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse stored scores; corrupt data yields None
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(book) = Self::from_json(&json) {
                    log::info!("Loaded scores (best {}, last {})", book.best, book.last);
                    return book;
                }
                log::warn!("Stored scores are corrupt, starting fresh");
            }
        }

        log::info!("No scores found, starting fresh");
        Self::new()
    }

    /// Save scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Scores saved (best {}, last {})", self.best, self.last);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(Self::FILE_NAME));
    }

    /// Load scores from a JSON file, falling back to empty
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Some(book) => {
                    log::info!("Loaded scores (best {}, last {})", book.best, book.last);
                    book
                }
                None => {
                    log::warn!("{} is corrupt, starting fresh", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Write scores to a JSON file; failures are logged, not fatal
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match std::fs::write(path, self.to_json()) {
            Ok(()) => log::info!("Scores saved (best {}, last {})", self.best, self.last),
            Err(e) => log::warn!("Failed to save scores to {}: {e}", path.display()),
        }
    }
}
