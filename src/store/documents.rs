use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::CrmResult;

/// Key-value document persistence. Values are JSON text; a missing key is
/// `Ok(None)`, not an error.
pub trait DocumentStore {
    fn load(&self, key: &str) -> CrmResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> CrmResult<()>;
}

impl<D: DocumentStore + ?Sized> DocumentStore for &D {
    fn load(&self, key: &str) -> CrmResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> CrmResult<()> {
        (**self).save(key, value)
    }
}

/// In-process document store, used by tests and for embedding without SQLite.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    docs: RefCell<HashMap<String, String>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing any serialization.
    pub fn with_raw(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.docs.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.docs.borrow().get(key).cloned()
    }
}

impl DocumentStore for MemoryDocuments {
    fn load(&self, key: &str) -> CrmResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &str) -> CrmResult<()> {
        self.docs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
