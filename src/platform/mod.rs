//! Platform abstraction layer
//!
//! Storage is the only platform concern the core carries: LocalStorage in
//! the browser, an in-process map on native (keeps persistence paths
//! exercised in tests). Failures never propagate - the caller keeps its
//! in-memory state and play continues.

/// Read a persisted value. Returns `None` when the key is missing or
/// storage is unavailable.
#[cfg(target_arch = "wasm32")]
pub fn read_key(key: &str) -> Option<String> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
    match storage {
        Some(storage) => storage.get_item(key).ok().flatten(),
        None => {
            log::warn!("LocalStorage unavailable, reading '{}' skipped", key);
            None
        }
    }
}

/// Write a persisted value. Logs and returns `false` on failure
/// (storage unavailable, quota exceeded).
#[cfg(target_arch = "wasm32")]
pub fn write_key(key: &str, value: &str) -> bool {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
    match storage {
        Some(storage) => match storage.set_item(key, value) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Failed to persist '{}' (quota?), continuing in-memory", key);
                false
            }
        },
        None => {
            log::warn!("LocalStorage unavailable, '{}' kept in-memory only", key);
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        static STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }

    pub fn read_key(key: &str) -> Option<String> {
        STORE.with(|s| s.borrow().get(key).cloned())
    }

    pub fn write_key(key: &str, value: &str) -> bool {
        STORE.with(|s| {
            s.borrow_mut().insert(key.to_string(), value.to_string());
        });
        true
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{read_key, write_key};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        assert!(write_key("platform_test_key", "42"));
        assert_eq!(read_key("platform_test_key"), Some("42".to_string()));
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(read_key("platform_never_written"), None);
    }
}
