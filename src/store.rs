//! High score persistence.
//!
//! The game only ever stores one integer, but it goes through a small
//! key-value trait so the session can run against browser `localStorage` or an
//! in-memory map in tests and native embedders.

use std::collections::HashMap;

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<JsValue> for StoreError {
    fn from(value: JsValue) -> Self {
        StoreError::Backend(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Process-local store. Used when `localStorage` is blocked and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`. Only usable on wasm in a browser.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StoreError> {
        let win = web_sys::window().ok_or(StoreError::Unavailable("no window"))?;
        let storage = win
            .local_storage()?
            .ok_or(StoreError::Unavailable("localStorage disabled"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(StoreError::from)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(StoreError::from)
    }
}

// --- High score codec ---------------------------------------------------------

/// Decode a stored high score. Missing, negative or garbled values read as 0.
pub fn parse_high_score(raw: Option<&str>) -> u32 {
    raw.and_then(decode_high_score).unwrap_or(0)
}

/// `None` when the stored text is not a non-negative integer.
fn decode_high_score(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// The high score slot of a store. Failures are logged and swallowed so a broken
/// store never interrupts play.
pub struct HighScore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> HighScore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn load(&self) -> u32 {
        match self.store.get(&self.key) {
            Ok(None) => 0,
            Ok(Some(raw)) => decode_high_score(&raw).unwrap_or_else(|| {
                log::warn!("ignoring unreadable high score {raw:?} under {}", self.key);
                0
            }),
            Err(e) => {
                log::warn!("high score load failed: {e}");
                0
            }
        }
    }

    pub fn save(&mut self, score: u32) {
        if let Err(e) = self.store.set(&self.key, &score.to_string()) {
            log::warn!("high score save failed: {e}");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
