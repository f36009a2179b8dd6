use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::PersistenceError;
use crate::json_merge::SettingsMap;

/// Raw storage for a plugin's persisted payload.
///
/// Backends know nothing about defaults, merging or reference stability; they
/// hand back whatever was stored last and replace it wholesale on save.
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    /// Returns the last persisted payload, or `None` if nothing was stored yet.
    ///
    /// No guarantee is made about the payload's shape.
    async fn load_data(&self) -> Result<Option<Value>, PersistenceError>;

    /// Replaces the persisted payload with `data`.
    async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<P: SettingsPersistence + ?Sized> SettingsPersistence for Arc<P> {
    async fn load_data(&self) -> Result<Option<Value>, PersistenceError> {
        (**self).load_data().await
    }

    async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError> {
        (**self).save_data(data).await
    }
}

#[async_trait]
impl<P: SettingsPersistence + ?Sized> SettingsPersistence for Box<P> {
    async fn load_data(&self) -> Result<Option<Value>, PersistenceError> {
        (**self).load_data().await
    }

    async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError> {
        (**self).save_data(data).await
    }
}
