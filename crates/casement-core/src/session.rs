//! Session-scoped key-value storage.
//!
//! A flat `String → value` scratch space that lives for the whole process
//! and is shared by every layer of the app, the place for things like the
//! logged-in user or a selected locale. Reads of absent keys return `None`;
//! nothing here notifies anybody. Single-threaded by design, like the rest
//! of the runtime: each thread sees its own store and the UI thread is the
//! intended user.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

thread_local! {
    static SESSION: SessionStore = SessionStore::new();
}

/// The shared session store, created lazily on first access and never torn
/// down for the lifetime of the process.
pub fn session() -> SessionStore {
    SESSION.with(|s| s.clone())
}

#[derive(Clone, Default)]
pub struct SessionStore {
    entries: Rc<RefCell<HashMap<String, Rc<dyn Any>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, or `None` when the key is
    /// absent. A value stored with a different type also reads as `None`.
    pub fn get_item<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        let stored = self.entries.borrow().get(key).cloned()?;
        match stored.downcast::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("session key '{key}' holds a value of another type");
                None
            }
        }
    }

    /// Stores `value` under `key`, silently replacing any previous value.
    pub fn set_item<T: 'static>(&self, key: impl Into<String>, value: T) {
        self.entries.borrow_mut().insert(key.into(), Rc::new(value));
    }

    /// No-op when the key is absent.
    pub fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
