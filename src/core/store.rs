use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

type Entries = BTreeMap<String, Vec<u8>>;

/// Key-value store holding JSON documents.
///
/// Each store is independent, so callers (and tests) open as many isolated
/// stores as they need. Mutations that touch several keys go through
/// [`Store::transaction`].
///
/// A store belongs to one thread. It can be moved to another thread but not
/// shared, so no write can land between a transaction's snapshot and its
/// rollback:
///
/// ```compile_fail
/// fn shared<T: Sync>(_: &T) {}
/// shared(&bord_feed::Store::open_in_memory());
/// ```
#[derive(Default)]
pub struct Store {
    entries: RefCell<Entries>,
}

impl Store {
    pub fn open_in_memory() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<RefMut<'_, Entries>> {
        self.entries
            .try_borrow_mut()
            .map_err(|e| anyhow!("Store already borrowed: {}", e))
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries()?.contains_key(key))
    }

    pub fn get_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, &bytes)
    }

    /// Runs `f` against this store, restoring every key to its prior state if
    /// `f` returns an error. The snapshot is a full copy of the map.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Store) -> std::result::Result<T, E>,
        E: From<anyhow::Error>,
    {
        let snapshot = self.entries()?.clone();

        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("Rolling back store transaction");
                *self.entries()? = snapshot;
                Err(err)
            }
        }
    }
}
