use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use web_sys::Storage;

pub const EMAIL_SUBMITTED_KEY: &str = "orderBumpEmailSubmitted";
pub const DISMISSED_KEY: &str = "orderBumpDismissed";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Survives browser restarts.
    Durable,
    /// Cleared when the browsing session ends.
    Session,
}

pub trait KeyValueStore {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String>;
    fn set(&self, scope: StorageScope, key: &str, value: &str);
}

/// `localStorage` for durable keys, `sessionStorage` for session keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn area(scope: StorageScope) -> Option<Storage> {
        let window = web_sys::window()?;
        let area = match scope {
            StorageScope::Durable => window.local_storage(),
            StorageScope::Session => window.session_storage(),
        };
        area.ok().flatten()
    }

    pub fn available() -> bool {
        Self::area(StorageScope::Durable).is_some() && Self::area(StorageScope::Session).is_some()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        Self::area(scope)?.get_item(key).ok().flatten()
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) {
        match Self::area(scope) {
            Some(area) => {
                if area.set_item(key, value).is_err() {
                    warn!("Failed to write {} to {:?} storage", key, scope);
                }
            }
            None => warn!("{:?} storage unavailable, {} not persisted", scope, key),
        }
    }
}

/// Page-lifetime store used when the browser refuses storage access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<(StorageScope, String), String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        self.entries.borrow().get(&(scope, key.to_string())).cloned()
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert((scope, key.to_string()), value.to_string());
    }
}

pub fn browser_store() -> Rc<dyn KeyValueStore> {
    if BrowserStorage::available() {
        Rc::new(BrowserStorage)
    } else {
        warn!("Browser storage unavailable, order bump flags will reset on reload");
        Rc::new(MemoryStore::default())
    }
}

/// The two flags that gate the order bump popup.
#[derive(Clone)]
pub struct OrderBumpFlags {
    store: Rc<dyn KeyValueStore>,
}

impl PartialEq for OrderBumpFlags {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl OrderBumpFlags {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn email_submitted(&self) -> bool {
        self.store
            .get(StorageScope::Durable, EMAIL_SUBMITTED_KEY)
            .as_deref()
            == Some("true")
    }

    pub fn mark_email_submitted(&self) {
        self.store.set(StorageScope::Durable, EMAIL_SUBMITTED_KEY, "true");
    }

    pub fn dismissed(&self) -> bool {
        self.store.get(StorageScope::Session, DISMISSED_KEY).is_some()
    }

    pub fn mark_dismissed(&self, at_millis: i64) {
        self.store
            .set(StorageScope::Session, DISMISSED_KEY, &at_millis.to_string());
    }
}
