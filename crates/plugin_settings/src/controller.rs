use std::sync::Arc;

use async_trait::async_trait;
use paths::PluginPaths;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::defaults::{kind_of, DefaultsSource, TypedDefaults};
use crate::errors::{PersistenceError, SettingsError, SettingsResult};
use crate::file_json::JsonFilePersistence;
use crate::handle::SettingsHandle;
use crate::json_merge::{deep_purge, overlay, SettingsMap};
use crate::persistence::SettingsPersistence;

/// Settings lifecycle of a plugin.
///
/// Nothing calls these methods on its own: hosts load settings on activation,
/// save after edits and forward externally detected changes of the persisted
/// data (e.g. a file sync rewriting `data.json`) to
/// [`on_external_settings_change`](Self::on_external_settings_change).
///
/// Lifecycle calls are not serialized. Two overlapping `load_settings` calls
/// both purge the same object and can interleave; callers await one before
/// issuing the next.
#[async_trait]
pub trait SettingsLifecycle: Send + Sync {
    /// The live settings object. Its identity never changes; only its entries do.
    fn settings(&self) -> &SettingsHandle;

    /// A complete, freshly produced default settings object.
    fn default_settings(&self) -> SettingsResult<SettingsMap>;

    /// Purges the live object in place, applies the defaults, then overlays
    /// the persisted payload's top-level entries.
    async fn load_settings(&self) -> SettingsResult<()>;

    /// Persists the live object wholesale.
    async fn save_settings(&self) -> SettingsResult<()>;

    /// Re-derives the live object after the persisted data changed outside
    /// the plugin. Reloads by default.
    async fn on_external_settings_change(&self) -> SettingsResult<()> {
        self.load_settings().await
    }
}

/// Builder for [`SettingsController`].
#[derive(Default)]
pub struct SettingsControllerBuilder {
    defaults: Option<Box<dyn DefaultsSource>>,
    persistence: Option<Arc<dyn SettingsPersistence>>,
}

impl SettingsControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults<D>(mut self, defaults: D) -> Self
    where
        D: DefaultsSource + 'static,
    {
        self.defaults = Some(Box::new(defaults));
        self
    }

    /// Defaults from `T::default()`.
    pub fn with_typed_defaults<T>(self) -> Self
    where
        T: Default + Serialize + 'static,
    {
        self.with_defaults(TypedDefaults::<T>::new())
    }

    pub fn with_persistence<P>(mut self, persistence: P) -> Self
    where
        P: SettingsPersistence + 'static,
    {
        self.persistence = Some(Arc::new(persistence));
        self
    }

    /// Persistence the host keeps its own reference to.
    pub fn with_shared_persistence(mut self, persistence: Arc<dyn SettingsPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Persist to the plugin's `data.json` below `paths`.
    pub fn with_plugin_paths(self, paths: &PluginPaths) -> Self {
        self.with_persistence(JsonFilePersistence::for_plugin(paths))
    }

    pub fn build(self) -> SettingsResult<SettingsController> {
        let defaults = self
            .defaults
            .ok_or(SettingsError::Invalid("defaults source not specified"))?;
        let persistence = self
            .persistence
            .ok_or(SettingsError::Invalid("persistence not specified"))?;

        Ok(SettingsController {
            settings: SettingsHandle::new(),
            defaults,
            persistence,
        })
    }
}

/// Owns one reference-stable settings object and drives its lifecycle.
///
/// The object starts out empty; it is only fully initialized once
/// [`load_settings`](SettingsLifecycle::load_settings) has completed.
pub struct SettingsController {
    settings: SettingsHandle,
    defaults: Box<dyn DefaultsSource>,
    persistence: Arc<dyn SettingsPersistence>,
}

impl SettingsController {
    pub fn builder() -> SettingsControllerBuilder {
        SettingsControllerBuilder::new()
    }

    pub fn new<D, P>(defaults: D, persistence: P) -> Self
    where
        D: DefaultsSource + 'static,
        P: SettingsPersistence + 'static,
    {
        Self {
            settings: SettingsHandle::new(),
            defaults: Box::new(defaults),
            persistence: Arc::new(persistence),
        }
    }

    /// Raw persisted payload, straight from the backend.
    pub async fn load_data(&self) -> Result<Option<Value>, PersistenceError> {
        self.persistence.load_data().await
    }

    /// Writes `data` straight to the backend, bypassing the live object.
    pub async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError> {
        self.persistence.save_data(data).await
    }
}

#[async_trait]
impl SettingsLifecycle for SettingsController {
    fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    fn default_settings(&self) -> SettingsResult<SettingsMap> {
        self.defaults.default_settings()
    }

    async fn load_settings(&self) -> SettingsResult<()> {
        let defaults = self.default_settings()?;

        // Reset before retrieval: a failing backend leaves the defaults in place.
        {
            let mut current = self.settings.write().await;
            overlay(deep_purge(&mut current), defaults);
        }

        let raw = self.persistence.load_data().await.map_err(|e| {
            warn!(error = %e, "failed to load persisted settings, keeping defaults");
            SettingsError::Retrieval(e)
        })?;

        let persisted = match raw {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => {
                debug!("no persisted settings, using defaults");
                SettingsMap::new()
            }
            Some(other) => {
                warn!(
                    kind = kind_of(&other),
                    "persisted settings are not an object, ignoring them"
                );
                SettingsMap::new()
            }
        };
        let overridden = persisted.len();

        let mut current = self.settings.write().await;
        overlay(&mut current, persisted);
        info!(keys = current.len(), overridden, "settings loaded");
        Ok(())
    }

    async fn save_settings(&self) -> SettingsResult<()> {
        let current = self.settings.read().await;
        self.persistence.save_data(&current).await.map_err(|e| {
            warn!(error = %e, "failed to persist settings");
            SettingsError::Persist(e)
        })?;
        debug!(keys = current.len(), "settings saved");
        Ok(())
    }
}
