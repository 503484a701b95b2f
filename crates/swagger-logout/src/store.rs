use std::cell::RefCell;

use serde_json::Value;
use tracing::debug;

use crate::error::LogoutError;
use crate::search::{deep_find, is_truthy, looks_like_compact_token};

/// Enumerable string key-value store, shaped after the Web Storage API.
pub trait KeyValueStore {
    fn length(&self) -> Result<usize, LogoutError>;
    fn key(&self, index: usize) -> Result<Option<String>, LogoutError>;
    fn get_item(&self, key: &str) -> Result<Option<String>, LogoutError>;
}

/// A token found in a store, with the storage key it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHit {
    pub key: String,
    pub token: String,
}

/// Walk every entry of `store` in index order.
///
/// JSON values are searched for `keys`; a hit counts only when it is a
/// non-empty string. Values that do not parse, or parse to something falsy,
/// fall back to the compact-token heuristic on the raw text. Any access error
/// aborts the scan of this store.
pub fn scan_store<S, K>(
    store: &S,
    keys: &[K],
    max_depth: usize,
) -> Result<Option<StoreHit>, LogoutError>
where
    S: KeyValueStore + ?Sized,
    K: AsRef<str>,
{
    for index in 0..store.length()? {
        let Some(key) = store.key(index)? else {
            continue;
        };
        let Some(raw) = store.get_item(&key)? else {
            continue;
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) if is_truthy(&parsed) => {
                if let Some(Value::String(token)) = deep_find(&parsed, keys, max_depth) {
                    if !token.is_empty() {
                        debug!(key = %key, "structured token match");
                        return Ok(Some(StoreHit { key, token: token.clone() }));
                    }
                }
            }
            _ => {
                if looks_like_compact_token(&raw) {
                    debug!(key = %key, "compact token heuristic match");
                    return Ok(Some(StoreHit { key, token: raw }));
                }
            }
        }
    }
    Ok(None)
}

/// In-memory store preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (k, v) in entries {
            store.set_item(k, v);
        }
        store
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn length(&self) -> Result<usize, LogoutError> {
        Ok(self.entries.borrow().len())
    }

    fn key(&self, index: usize) -> Result<Option<String>, LogoutError> {
        Ok(self.entries.borrow().get(index).map(|(k, _)| k.clone()))
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, LogoutError> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }
}
