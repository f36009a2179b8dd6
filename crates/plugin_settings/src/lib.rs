//! Reference-stable settings lifecycle for plugins.
//!
//! A [`SettingsController`] owns exactly one settings object for its whole
//! lifetime. Loading purges that object in place, applies the plugin's
//! defaults and overlays whatever the persistence backend returns; saving
//! hands the live object to the backend as-is. Consumers hold a
//! [`SettingsHandle`] and keep seeing the same object across every reload.

mod controller;
mod defaults;
mod errors;
mod file_json;
mod handle;
mod in_memory;
mod json_merge;
mod key_path;
mod persistence;

pub use controller::{SettingsController, SettingsControllerBuilder, SettingsLifecycle};
pub use defaults::{to_settings_map, DefaultsSource, TypedDefaults};
pub use errors::{PersistenceError, SettingsError, SettingsResult};
pub use file_json::JsonFilePersistence;
pub use handle::SettingsHandle;
pub use in_memory::MemoryPersistence;
pub use json_merge::{deep_purge, deep_purge_value, overlay, SettingsMap};
pub use key_path::KeyPath;
pub use paths::PluginPaths;
pub use persistence::SettingsPersistence;
