use swagger_logout::{KeyValueStore, LogoutError};
use tracing::debug;
use web_sys::{Storage, Window};

use crate::js::describe;

/// `window.sessionStorage` / `window.localStorage` behind the store port.
pub struct BrowserStore {
    storage: Storage,
}

impl KeyValueStore for BrowserStore {
    fn length(&self) -> Result<usize, LogoutError> {
        self.storage
            .length()
            .map(|n| n as usize)
            .map_err(|e| LogoutError::Storage(describe(&e)))
    }

    fn key(&self, index: usize) -> Result<Option<String>, LogoutError> {
        let index = u32::try_from(index).map_err(|e| LogoutError::Storage(e.to_string()))?;
        self.storage
            .key(index)
            .map_err(|e| LogoutError::Storage(describe(&e)))
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, LogoutError> {
        self.storage
            .get_item(key)
            .map_err(|e| LogoutError::Storage(describe(&e)))
    }
}

pub fn session_store(window: &Window) -> Option<BrowserStore> {
    open("sessionStorage", window.session_storage())
}

pub fn local_store(window: &Window) -> Option<BrowserStore> {
    open("localStorage", window.local_storage())
}

// Sandboxed frames and disabled cookies make the getter throw.
fn open(
    name: &str,
    storage: Result<Option<Storage>, wasm_bindgen::JsValue>,
) -> Option<BrowserStore> {
    match storage {
        Ok(Some(storage)) => Some(BrowserStore { storage }),
        Ok(None) => {
            debug!(store = name, "storage not available");
            None
        }
        Err(e) => {
            debug!(store = name, error = %describe(&e), "storage access denied");
            None
        }
    }
}
