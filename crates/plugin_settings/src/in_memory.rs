use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::PersistenceError;
use crate::json_merge::SettingsMap;
use crate::persistence::SettingsPersistence;

/// MemoryPersistence: keeps the persisted payload in memory.
///
/// The stored payload is an arbitrary `Value`, so hosts can seed it with
/// malformed data (`null`, strings, arrays) to exercise the lifecycle the way
/// a hand-edited `data.json` would. Loads and saves can be switched to fail.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    payload: Mutex<Option<Value>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    /// Empty storage: `load_data` yields `None` until something is saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `payload`.
    pub fn with_payload(payload: Value) -> Self {
        Self {
            payload: Mutex::new(Some(payload)),
            ..Self::default()
        }
    }

    /// Current stored payload.
    pub fn payload(&self) -> Option<Value> {
        self.lock().clone()
    }

    /// Replaces the stored payload, as an external writer would.
    pub fn set_payload(&self, payload: Option<Value>) {
        *self.lock() = payload;
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of `load_data` calls so far, failed ones included.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of `save_data` calls so far, failed ones included.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Value>> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SettingsPersistence for MemoryPersistence {
    async fn load_data(&self) -> Result<Option<Value>, PersistenceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Other("memory load disabled".into()));
        }
        Ok(self.payload())
    }

    async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Other("memory save disabled".into()));
        }
        *self.lock() = Some(Value::Object(data.clone()));
        Ok(())
    }
}
