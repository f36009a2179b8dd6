//! Path resolution for plugin data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the persisted settings payload inside a plugin directory.
pub const DATA_FILE_NAME: &str = "data.json";

/// Directory name grouping all plugin directories below the base path.
pub const PLUGINS_DIR_NAME: &str = "plugins";

/// Locates the on-disk home of a single plugin: `<base>/plugins/<plugin_id>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPaths {
    /// Base path for all plugin data
    base_path: Arc<Path>,
    /// Plugin identifier (e.g., "daily-notes")
    plugin_id: String,
}

impl PluginPaths {
    /// Creates paths below the platform configuration directory.
    ///
    /// Falls back to the current directory when the platform does not report
    /// one (e.g. a stripped-down container without `$HOME`).
    pub fn new(plugin_id: impl Into<String>) -> Self {
        let base_path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_base_path(base_path, plugin_id)
    }

    /// Creates paths with an explicit base path (useful for testing).
    pub fn with_base_path(base_path: impl Into<PathBuf>, plugin_id: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into().into(),
            plugin_id: plugin_id.into(),
        }
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the plugin identifier.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Returns the plugin directory: `<base>/plugins/<plugin_id>/`
    pub fn plugin_dir(&self) -> PathBuf {
        self.base_path.join(PLUGINS_DIR_NAME).join(&self.plugin_id)
    }

    /// Returns the persisted payload path: `<base>/plugins/<plugin_id>/data.json`
    pub fn data_file(&self) -> PathBuf {
        self.plugin_dir().join(DATA_FILE_NAME)
    }

    /// Ensures the plugin directory exists.
    pub fn ensure_plugin_dir(&self) -> std::io::Result<()> {
        let dir = self.plugin_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
