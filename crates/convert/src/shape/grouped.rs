use super::{convert_array, SheetInput};
use crate::coerce::number_value;
use crate::error::ConvertResult;
use crate::path;
use crate::store::SheetStore;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

/// What a bucket of rows sharing the same key turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// `dictionary`: a single element; on duplicate keys the last row wins
    Dictionary,
    /// `mappedlist`: the bucket as an array
    List,
    /// `mappedfirst`: the first element of the bucket
    First,
    /// `mappedvalues`: the `value` attribute of every element
    Values,
}

impl GroupMode {
    fn finish(self, key: &str, mut bucket: Vec<Value>) -> Value {
        match self {
            GroupMode::Dictionary => {
                if bucket.len() > 1 {
                    tracing::debug!(key, rows = bucket.len(), "duplicate dictionary key, keeping last row");
                }
                bucket.pop().unwrap_or(Value::Null)
            }
            GroupMode::List => Value::Array(bucket),
            GroupMode::First => bucket.into_iter().next().unwrap_or(Value::Null),
            GroupMode::Values => Value::Array(
                bucket
                    .iter()
                    .map(|element| path::get(element, "value").cloned().unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupMode::Dictionary => "dictionary",
            GroupMode::List => "mappedlist",
            GroupMode::First => "mappedfirst",
            GroupMode::Values => "mappedvalues",
        };
        write!(f, "{name}")
    }
}

/// Convert the rows like `array`, then group them by `keys`.
pub fn convert_grouped(
    store: &SheetStore,
    input: &SheetInput<'_>,
    keys: &[&str],
    mode: GroupMode,
    remove_key: bool,
) -> ConvertResult<Value> {
    let elements = convert_array(store, input)?;
    Ok(group_by(elements, keys, remove_key, &|key: &str, bucket: Vec<Value>| {
        mode.finish(key, bucket)
    }))
}

/// Group `elements` by the value at each key path, one nesting level per key.
///
/// Buckets at the last level are handed to `finish`. With `remove_key` the
/// grouping attributes are stripped from every element first. Keys keep the
/// order in which they are first seen.
///
/// # Example
/// ```
/// use serde_json::{json, Value};
/// use sheetsync_convert::shape::group_by;
///
/// let rows = vec![json!({"team": "x", "id": 1}), json!({"team": "y", "id": 2})];
/// let grouped = group_by(rows, &["team"], true, &|_: &str, bucket: Vec<Value>| Value::Array(bucket));
/// assert_eq!(grouped, json!({"x": [{"id": 1}], "y": [{"id": 2}]}));
/// ```
pub fn group_by(
    elements: Vec<Value>,
    keys: &[&str],
    remove_key: bool,
    finish: &dyn Fn(&str, Vec<Value>) -> Value,
) -> Value {
    group_level(elements, keys, keys, remove_key, finish)
}

fn group_level(
    elements: Vec<Value>,
    all_keys: &[&str],
    keys: &[&str],
    remove_key: bool,
    finish: &dyn Fn(&str, Vec<Value>) -> Value,
) -> Value {
    let Some((key, rest)) = keys.split_first() else {
        return Value::Array(elements);
    };

    let mut buckets: IndexMap<String, Vec<Value>> = IndexMap::new();
    for element in elements {
        let bucket_key = key_string(path::get(&element, key));
        buckets.entry(bucket_key).or_default().push(element);
    }

    let mut result = Map::with_capacity(buckets.len());
    for (bucket_key, mut bucket) in buckets {
        let value = if rest.is_empty() {
            if remove_key {
                strip_keys(&mut bucket, all_keys);
            }
            finish(&bucket_key, bucket)
        } else {
            group_level(bucket, all_keys, rest, remove_key, finish)
        };
        result.insert(bucket_key, value);
    }
    Value::Object(result)
}

fn strip_keys(bucket: &mut [Value], keys: &[&str]) {
    for element in bucket {
        if let Value::Object(map) = element {
            for key in keys {
                path::remove(map, key);
            }
        }
    }
}

/// Object key for a grouping value, stringified the way a script would.
fn key_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => match number_value(f) {
                Value::Number(n) => n.to_string(),
                _ => f.to_string(),
            },
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}
