//! Bearer token persistence

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

/// File name of the persistent key-value store inside the data directory
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Storage for the single current bearer token
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear_token(&self);
}

/// In-process token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}

/// Token storage backed by a JSON key-value file
///
/// The file may hold other keys; only `key` is touched. Contents are written
/// in plaintext and rely on filesystem permissions for confidentiality.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Store located at `<data_dir>/storage.json`
    pub fn in_dir(data_dir: &Path, key: impl Into<String>) -> Self {
        Self::new(data_dir.join(STORAGE_FILE_NAME), key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Map<String, Value> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Ignoring unreadable token storage");
                Map::new()
            }
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %error, "Failed to create storage directory");
                return;
            }
        }

        let result = serde_json::to_string_pretty(entries)
            .map_err(std::io::Error::other)
            .and_then(|content| std::fs::write(&self.path, content));
        if let Err(error) = result {
            warn!(path = %self.path.display(), %error, "Failed to write token storage");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Option<String> {
        self.read_entries()
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_token(&self, token: &str) {
        let mut entries = self.read_entries();
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries);
    }

    fn clear_token(&self) {
        let mut entries = self.read_entries();
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries);
        }
    }
}
