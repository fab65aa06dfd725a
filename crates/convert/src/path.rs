//! Dotted-path access into JSON object trees.
//!
//! A path is either a plain key (`"id"`) or a dotted string (`"stats.attack"`).
//! Writes create missing intermediate objects; reads walk objects by key and
//! arrays by index.

use serde_json::{Map, Value};

/// Look up `path` inside `root`.
///
/// An exact key match on an object wins over dotted traversal, so map keys
/// that contain dots stay reachable.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    match root {
        Value::Object(map) => lookup(map, path),
        _ => walk(root, path.split('.')),
    }
}

/// [`get`] for a bare object map.
#[must_use]
pub fn lookup<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let first = map.get(segments.next()?)?;
    walk(first, segments)
}

fn walk<'a, 'p>(mut node: &'a Value, segments: impl Iterator<Item = &'p str>) -> Option<&'a Value> {
    for segment in segments {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Store `value` at `path`, creating intermediate objects as needed.
///
/// An intermediate segment that already holds a non-object value is replaced
/// by an empty object (last write wins).
pub fn set(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut node = root;
    for segment in segments {
        if !matches!(node.get(segment), Some(Value::Object(_))) {
            node.insert(segment.to_string(), Value::Object(Map::new()));
        }
        node = match node.get_mut(segment) {
            Some(Value::Object(map)) => map,
            _ => return,
        };
    }
    node.insert(leaf.to_string(), value);
}

/// Remove and return the value at `path`. Parent objects are left in place.
pub fn remove(root: &mut Map<String, Value>, path: &str) -> Option<Value> {
    if root.contains_key(path) {
        return root.shift_remove(path);
    }

    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop()?;

    let mut node = root;
    for segment in segments {
        node = match node.get_mut(segment) {
            Some(Value::Object(map)) => map,
            _ => return None,
        };
    }
    node.shift_remove(leaf)
}

/// Read or write in one call: with `Some(value)` the value is stored and
/// returned, with `None` the current value (if any) is returned.
pub fn access(root: &mut Map<String, Value>, path: &str, value: Option<Value>) -> Option<Value> {
    match value {
        Some(value) => {
            set(root, path, value.clone());
            Some(value)
        }
        None => lookup(root, path).cloned(),
    }
}

/// Expand a flat map keyed by dotted paths into a nested object tree.
///
/// Entries are applied in order; when two paths target the same leaf the
/// later one wins.
pub fn unflatten<I, K>(flat: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut result = Map::new();
    for (key, value) in flat {
        set(&mut result, key.as_ref(), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_unflatten_nested() {
        let nested = unflatten([("a.b", json!(1)), ("a.c", json!(2)), ("d", json!("x"))]);
        assert_eq!(Value::Object(nested), json!({"a": {"b": 1, "c": 2}, "d": "x"}));
    }

    #[test]
    fn test_unflatten_last_writer_wins() {
        let nested = unflatten([("a.b", json!(1)), ("a.b", json!(2))]);
        assert_eq!(Value::Object(nested), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut root = object(json!({"a": 5}));
        set(&mut root, "a.b", json!(true));
        assert_eq!(Value::Object(root), json!({"a": {"b": true}}));
    }

    #[test]
    fn test_set_keeps_existing_siblings() {
        let mut root = object(json!({"a": {"x": 1}}));
        set(&mut root, "a.y.z", json!(2));
        assert_eq!(Value::Object(root), json!({"a": {"x": 1, "y": {"z": 2}}}));
    }

    #[test]
    fn test_get() {
        let root = json!({"unit": {"stats": {"hp": 10}}, "list": [{"id": "a"}], "x.y": 1});
        assert_eq!(get(&root, "unit.stats.hp"), Some(&json!(10)));
        assert_eq!(get(&root, "list.0.id"), Some(&json!("a")));
        assert_eq!(get(&root, "x.y"), Some(&json!(1)));
        assert_eq!(get(&root, "unit.missing"), None);
        assert_eq!(get(&root, "unit.stats.hp.deeper"), None);
        assert_eq!(get(&json!([1, 2]), "1"), Some(&json!(2)));
    }

    #[test]
    fn test_remove() {
        let mut root = object(json!({"team": "x", "meta": {"key": 1, "other": 2}, "id": 3}));
        assert_eq!(remove(&mut root, "team"), Some(json!("x")));
        assert_eq!(remove(&mut root, "meta.key"), Some(json!(1)));
        assert_eq!(remove(&mut root, "meta.nothing"), None);
        assert_eq!(Value::Object(root), json!({"meta": {"other": 2}, "id": 3}));
    }

    #[test]
    fn test_access() {
        let mut root = Map::new();
        assert_eq!(access(&mut root, "a.b", None), None);
        assert_eq!(access(&mut root, "a.b", Some(json!(7))), Some(json!(7)));
        assert_eq!(access(&mut root, "a.b", None), Some(json!(7)));
    }
}
