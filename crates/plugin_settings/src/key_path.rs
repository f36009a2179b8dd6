use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::json_merge::SettingsMap;

/// Dotted path into the settings object, e.g. `editor.font.size`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(pub Vec<String>);

impl KeyPath {
    pub fn from_slice(parts: &[&str]) -> Self {
        KeyPath(parts.iter().map(|s| s.to_string()).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walks nested objects along the path. Arrays are not indexed.
    ///
    /// Returns `None` for the empty path; the root is not a `Value`.
    pub fn lookup<'a>(&self, root: &'a SettingsMap) -> Option<&'a Value> {
        let (first, rest) = self.0.split_first()?;
        let mut cur = root.get(first)?;
        for seg in rest {
            cur = cur.as_object()?.get(seg)?;
        }
        Some(cur)
    }
}

impl FromStr for KeyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyPath(
            s.split('.')
                .filter(|seg| !seg.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(path) => path,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}
