//! Walks a plugin through its settings lifecycle against a `data.json` in the
//! system temp directory.
//!
//! Run with `RUST_LOG=debug` to see the controller's log output.

use plugin_settings::{PluginPaths, SettingsController, SettingsLifecycle};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Serialize, Deserialize)]
struct DailyNotes {
    folder: String,
    template: Option<String>,
    open_on_startup: bool,
}

impl Default for DailyNotes {
    fn default() -> Self {
        Self {
            folder: "journal".into(),
            template: None,
            open_on_startup: true,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let paths = PluginPaths::with_base_path(std::env::temp_dir(), "daily-notes-demo");
    info!(file = %paths.data_file().display(), "using plugin data file");

    let plugin = SettingsController::builder()
        .with_typed_defaults::<DailyNotes>()
        .with_plugin_paths(&paths)
        .build()?;

    plugin.load_settings().await?;
    let handle = plugin.settings().clone();
    let loaded: DailyNotes = handle.get_as().await?;
    info!(settings = ?loaded, "loaded");

    handle
        .write()
        .await
        .insert("folder".into(), json!("notes/daily"));
    plugin.save_settings().await?;

    // pretend a sync client touched data.json
    plugin.on_external_settings_change().await?;
    let folder = handle.get("folder").await;
    info!(
        same_object = handle.ptr_eq(plugin.settings()),
        folder = ?folder,
        "reloaded"
    );

    Ok(())
}
