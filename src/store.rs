use std::fs;
use std::path::PathBuf;

use termrc_sdk::host::KeyValueStore;
use tracing::debug;

use crate::error::Fallback;

pub const THEME_CURRENT_KEY: &str = "theme_current";
pub const THEME_RANDOM_KEY: &str = "theme_random";

/// One flat file per key under a fixed directory. Writes overwrite in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!(fallback = %Fallback::FileAbsent, path = %path.display(), error = %e, "store load");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) -> bool {
        let _ = fs::create_dir_all(&self.dir);
        let path = self.path_for(key);
        match fs::write(&path, value) {
            Ok(()) => true,
            Err(e) => {
                debug!(fallback = %Fallback::FileWriteFailed, path = %path.display(), error = %e, "store save");
                false
            }
        }
    }
}

/// Default per-user state directory (`<config_dir>/termrc`).
#[must_use]
pub fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termrc")
}
