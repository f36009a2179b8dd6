use thiserror::Error;

/// Failures reported by a [`SettingsPersistence`](crate::SettingsPersistence) backend.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("other: {0}")]
    Other(String),
}

/// Failures surfaced by the settings lifecycle operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// `load_data` failed. The live settings are left purged and populated
    /// with defaults only.
    #[error("failed to retrieve persisted settings: {0}")]
    Retrieval(#[source] PersistenceError),

    /// `save_data` failed. The live settings are untouched.
    #[error("failed to persist settings: {0}")]
    Persist(#[source] PersistenceError),

    #[error("invalid defaults: {0}")]
    Defaults(String),

    #[error("invalid: {0}")]
    Invalid(&'static str),

    #[error("deserialize settings: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
