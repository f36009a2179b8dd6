use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use paths::PluginPaths;
use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::PersistenceError;
use crate::json_merge::SettingsMap;
use crate::persistence::SettingsPersistence;

/// JsonFilePersistence: the plugin's `data.json` on disk.
///
/// Notes:
/// - A missing or whitespace-only file reads as "nothing persisted yet".
/// - Saving serializes to a sibling temp file and renames it into place. The
///   whole write runs under an exclusive advisory lock on a sibling
///   `<name>.lock` file, so overlapping saves (threads or processes) queue up
///   instead of sharing the temp file.
/// - Parent directories are created on save, not on construction.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend for `<plugin_dir>/data.json`.
    pub fn for_plugin(paths: &PluginPaths) -> Self {
        Self::new(paths.data_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "data.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn tmp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }
}

/// Runs `f` while holding an exclusive lock on `lock_path` (created if needed).
fn with_lock<F, R>(lock_path: &Path, f: F) -> Result<R, PersistenceError>
where
    F: FnOnce() -> Result<R, PersistenceError>,
{
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    lock_file.lock_exclusive()?;
    let res = f();
    lock_file.unlock()?;
    res
}

fn write_atomic(
    path: &Path,
    tmp: &Path,
    lock_path: &Path,
    bytes: &[u8],
) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    with_lock(lock_path, || {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(tmp, path)?;
        Ok(())
    })
}

#[async_trait]
impl SettingsPersistence for JsonFilePersistence {
    async fn load_data(&self) -> Result<Option<Value>, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted settings file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            debug!(path = %self.path.display(), "persisted settings file is empty");
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&content)?;
        trace!(path = %self.path.display(), bytes = content.len(), "read persisted settings");
        Ok(Some(value))
    }

    async fn save_data(&self, data: &SettingsMap) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(data)?;
        let len = bytes.len();
        let path = self.path.clone();
        let tmp = self.tmp_path();
        let lock_path = self.lock_path();

        tokio::task::spawn_blocking(move || write_atomic(&path, &tmp, &lock_path, &bytes))
            .await
            .map_err(|e| PersistenceError::Task(e.to_string()))??;

        trace!(path = %self.path.display(), bytes = len, "wrote persisted settings");
        Ok(())
    }
}
