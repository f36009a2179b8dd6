//! In-place reset and shallow overlay over JSON settings objects.

use serde_json::{Map, Value};

/// The live settings object: string keys to arbitrary JSON values.
pub type SettingsMap = Map<String, Value>;

/// Recursively removes every non-object entry from `map`, in place.
///
/// Entries holding a nested object are kept and purged recursively, so the
/// skeleton of nested objects survives while every primitive, array and
/// `null` is dropped. Arrays are leaves: they are removed, never descended
/// into, even when they hold objects.
///
/// Surviving nested objects are cleared where they sit, under the same key,
/// and never replaced by a fresh map. Their memory address is not stable,
/// though: nested maps live inline in their parent's storage, so removing a
/// sibling entry can move them. Only the top-level map keeps its identity
/// (for the live settings object that identity is the `SettingsHandle`'s
/// `Arc`). Hold keys or `KeyPath`s into nested objects, not references.
///
/// Returns `map` again for chaining.
///
/// ```
/// use plugin_settings::deep_purge;
/// use serde_json::json;
///
/// let mut settings = json!({
///     "foo": 1,
///     "bar": { "nested": "value", "number": 42 },
///     "baz": "string",
///     "arr": [1, 2, 3]
/// });
/// deep_purge(settings.as_object_mut().unwrap());
/// assert_eq!(settings, json!({ "bar": {} }));
/// ```
pub fn deep_purge(map: &mut SettingsMap) -> &mut SettingsMap {
    map.retain(|_, value| match value {
        Value::Object(nested) => {
            deep_purge(nested);
            true
        }
        _ => false,
    });
    map
}

/// [`deep_purge`] for an arbitrary value. Non-object values are left alone.
pub fn deep_purge_value(value: &mut Value) -> &mut Value {
    if let Value::Object(map) = value {
        deep_purge(map);
    }
    value
}

/// Assigns every top-level entry of `source` onto `target`.
///
/// Existing keys are replaced wholesale; nested objects are not merged.
pub fn overlay(target: &mut SettingsMap, source: SettingsMap) -> &mut SettingsMap {
    for (key, value) in source {
        target.insert(key, value);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> SettingsMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn purge_keeps_nested_object_and_clears_it() {
        let mut map = object(json!({
            "primitive": 1,
            "nested": { "a": 1, "b": 2 }
        }));

        deep_purge(&mut map);

        assert!(!map.contains_key("primitive"));
        assert!(map.contains_key("nested"));
        assert!(map["nested"].as_object().unwrap().is_empty());
    }

    #[test]
    fn purge_removes_all_scalars() {
        let mut map = object(json!({ "a": 1, "b": "test", "c": true, "d": null }));

        let len = deep_purge(&mut map).len();

        assert_eq!(len, 0);
    }

    #[test]
    fn purge_recurses_through_nested_levels() {
        let mut map = object(json!({
            "a": { "b": { "c": 1 } },
            "d": [1, 2],
            "e": "value"
        }));

        deep_purge(&mut map);

        assert_eq!(Value::Object(map.clone()), json!({ "a": { "b": {} } }));
        assert_eq!(map["a"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn purge_treats_arrays_of_objects_as_leaves() {
        let mut map = object(json!({
            "records": [{ "id": 1 }, { "id": 2 }],
            "keep": {}
        }));

        deep_purge(&mut map);

        assert!(!map.contains_key("records"));
        assert!(map.contains_key("keep"));
    }

    #[test]
    fn purge_of_empty_map_is_noop() {
        let mut map = SettingsMap::new();
        assert!(deep_purge(&mut map).is_empty());
    }

    #[test]
    fn purge_keeps_nested_maps_under_their_keys_when_siblings_go() {
        let mut map = object(json!({
            "a": 1,
            "b": { "x": 1 },
            "c": 2,
            "d": { "y": 1, "deeper": { "z": [1], "w": {} } }
        }));
        let top = &map as *const SettingsMap;

        deep_purge(&mut map);

        // nested maps may have moved as "a" and "c" went; keys and shape stay
        assert_eq!(
            Value::Object(map.clone()),
            json!({ "b": {}, "d": { "deeper": { "w": {} } } })
        );
        assert_eq!(top, &map as *const SettingsMap);
    }

    #[test]
    fn purge_value_ignores_non_objects() {
        let mut value = json!([1, 2, 3]);
        deep_purge_value(&mut value);
        assert_eq!(value, json!([1, 2, 3]));

        let mut value = json!({ "x": 1, "y": {} });
        deep_purge_value(&mut value);
        assert_eq!(value, json!({ "y": {} }));
    }

    #[test]
    fn overlay_replaces_top_level_keys_only() {
        let mut target = object(json!({
            "a": 1,
            "b": { "x": 1, "y": 2 }
        }));
        let source = object(json!({
            "b": { "x": 10 },
            "c": 3
        }));

        overlay(&mut target, source);

        assert_eq!(
            Value::Object(target),
            json!({ "a": 1, "b": { "x": 10 }, "c": 3 })
        );
    }
}
