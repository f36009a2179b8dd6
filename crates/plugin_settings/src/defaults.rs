use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{SettingsError, SettingsResult};
use crate::json_merge::SettingsMap;

/// Produces the complete default settings object.
///
/// Called once per load cycle. The controller copies the returned entries
/// onto its own object, so implementations may build a fresh map every time
/// or clone a cached one.
pub trait DefaultsSource: Send + Sync {
    fn default_settings(&self) -> SettingsResult<SettingsMap>;
}

impl<F> DefaultsSource for F
where
    F: Fn() -> SettingsMap + Send + Sync,
{
    fn default_settings(&self) -> SettingsResult<SettingsMap> {
        Ok(self())
    }
}

impl DefaultsSource for SettingsMap {
    fn default_settings(&self) -> SettingsResult<SettingsMap> {
        Ok(self.clone())
    }
}

/// Defaults taken from a settings struct's `Default` impl.
///
/// ```
/// use plugin_settings::{DefaultsSource, TypedDefaults};
/// use serde::Serialize;
///
/// #[derive(Default, Serialize)]
/// struct Editor {
///     font_size: u32,
///     vim_mode: bool,
/// }
///
/// let defaults = TypedDefaults::<Editor>::new().default_settings().unwrap();
/// assert_eq!(defaults["font_size"], 0);
/// ```
pub struct TypedDefaults<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedDefaults<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedDefaults<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DefaultsSource for TypedDefaults<T>
where
    T: Default + Serialize,
{
    fn default_settings(&self) -> SettingsResult<SettingsMap> {
        to_settings_map(&T::default())
    }
}

/// Serializes `value` into a settings object. Anything that does not
/// serialize to a JSON object is rejected.
pub fn to_settings_map<T: Serialize>(value: &T) -> SettingsResult<SettingsMap> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SettingsError::Defaults(format!(
            "defaults must serialize to an object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(SettingsError::Defaults(e.to_string())),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
