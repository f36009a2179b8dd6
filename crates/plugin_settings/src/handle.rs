use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::SettingsResult;
use crate::json_merge::SettingsMap;
use crate::key_path::KeyPath;

/// Shared view of a controller's live settings object.
///
/// Every handle cloned from the same controller points at one allocation for
/// the controller's whole lifetime; reloads clear and refill it in place. A
/// handle can read and mutate individual entries but has no way to swap the
/// object the controller owns.
#[derive(Clone, Debug, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<SettingsMap>>,
}

impl SettingsHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SettingsMap> {
        self.inner.read().await
    }

    /// Mutable access to the entries. External writes are not guarded and
    /// are discarded by the next reload unless saved first.
    ///
    /// The guard hands out the whole map, so a caller can also replace or
    /// clear it wholesale. Editing individual fields only is a convention the
    /// handle does not enforce. The shared object (and `ptr_eq`) is unaffected
    /// either way; only its contents change.
    pub async fn write(&self) -> RwLockWriteGuard<'_, SettingsMap> {
        self.inner.write().await
    }

    /// Owned copy of the current entries.
    pub async fn snapshot(&self) -> SettingsMap {
        self.inner.read().await.clone()
    }

    /// Value at `path`, cloned. `None` if any segment is missing or not an object.
    pub async fn get(&self, path: impl Into<KeyPath>) -> Option<Value> {
        let path = path.into();
        let settings = self.inner.read().await;
        path.lookup(&settings).cloned()
    }

    /// Deserializes the whole object into a typed settings struct.
    pub async fn get_as<T: DeserializeOwned>(&self) -> SettingsResult<T> {
        let snapshot = self.snapshot().await;
        Ok(serde_json::from_value(Value::Object(snapshot))?)
    }

    /// Whether both handles view the same settings object.
    pub fn ptr_eq(&self, other: &SettingsHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
