use super::SheetInput;
use crate::coerce::coerce;
use crate::error::{ConvertError, ConvertResult};
use crate::path;
use crate::store::SheetStore;
use crate::types::TypeDescriptor;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use sheetsync_sheet::CellValue;

const KEY_COLUMN: &str = "key";
const TYPE_COLUMN: &str = "type";
const VALUE_COLUMN: &str = "value";
const VALUE_SET_PREFIX: &str = "value:";

/// Convert a pivoted sheet of `key`, `type` and `value` columns into an object.
///
/// Each row sets one (possibly dotted) key. A sheet may hold several value
/// sets in `value:<id>` columns sharing the same keys and types; the result is
/// then an object per id, unless `input.key` selects a single id.
/// There is no type row: the type of each row is in its `type` column.
pub fn convert_key_value(store: &SheetStore, input: &SheetInput<'_>) -> ConvertResult<Value> {
    let set_ids: Vec<&str> = input
        .header
        .iter()
        .filter_map(|column| column.strip_prefix(VALUE_SET_PREFIX))
        .collect();

    if let Some(id) = input.key {
        if !set_ids.contains(&id) {
            return Err(ConvertError::UnknownValueSet {
                sheet: input.name.to_string(),
                id: id.to_string(),
            });
        }
        let column = format!("{VALUE_SET_PREFIX}{id}");
        return Ok(Value::Object(build_set(store, input, &column)?));
    }

    if set_ids.is_empty() {
        return Ok(Value::Object(build_set(store, input, VALUE_COLUMN)?));
    }

    let mut sets = Map::with_capacity(set_ids.len());
    for id in set_ids {
        let column = format!("{VALUE_SET_PREFIX}{id}");
        sets.insert(id.to_string(), Value::Object(build_set(store, input, &column)?));
    }
    Ok(Value::Object(sets))
}

fn build_set(
    store: &SheetStore,
    input: &SheetInput<'_>,
    value_column: &str,
) -> ConvertResult<Map<String, Value>> {
    let mut flat: IndexMap<String, Value> = IndexMap::with_capacity(input.rows.len());

    for (index, row) in input.rows.iter().enumerate() {
        let Some(key) = row.get(KEY_COLUMN).map(CellValue::to_raw_string) else {
            tracing::debug!(sheet = input.name, row = index, "key-value row without key skipped");
            continue;
        };
        let label = input.label(&key);
        let descriptor = TypeDescriptor::from_cell(&label, row.get(TYPE_COLUMN));
        let raw = row.get(value_column).cloned().unwrap_or(CellValue::Empty);

        if let Some(value) = coerce(store, &label, &descriptor, index, &raw)? {
            flat.insert(key, value);
        }
    }

    Ok(path::unflatten(flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::test_support::{header, rows};
    use serde_json::json;

    #[test]
    fn test_single_value_set() {
        let header = header(&["key", "type", "value"]);
        let rows = rows(&[
            &[("key", "window.width"), ("type", "int"), ("value", "800")],
            &[("key", "window.title"), ("type", "string"), ("value", "Game")],
            &[("key", "debug"), ("type", "bool")],
            &[("key", "comment"), ("type", "ignore"), ("value", "x")],
        ]);
        let input = SheetInput {
            name: "config",
            header: &header,
            rows: &rows,
            key: None,
        };

        let result = convert_key_value(&SheetStore::new(), &input).unwrap();
        assert_eq!(
            result,
            json!({"window": {"width": 800, "title": "Game"}})
        );
    }

    #[test]
    fn test_multiple_value_sets() {
        let header = header(&["key", "type", "value:a", "value:b"]);
        let rows = rows(&[&[
            ("key", "width"),
            ("type", "int"),
            ("value:a", "10"),
            ("value:b", "20"),
        ]]);
        let input = SheetInput {
            name: "sizes",
            header: &header,
            rows: &rows,
            key: None,
        };

        let result = convert_key_value(&SheetStore::new(), &input).unwrap();
        assert_eq!(result, json!({"a": {"width": 10}, "b": {"width": 20}}));

        let only_b = SheetInput {
            key: Some("b"),
            ..input
        };
        let result = convert_key_value(&SheetStore::new(), &only_b).unwrap();
        assert_eq!(result, json!({"width": 20}));
    }

    #[test]
    fn test_unknown_value_set() {
        let header = header(&["key", "type", "value:a"]);
        let rows = rows(&[&[("key", "w"), ("type", "int"), ("value:a", "1")]]);
        let input = SheetInput {
            name: "sizes",
            header: &header,
            rows: &rows,
            key: Some("c"),
        };

        assert!(matches!(
            convert_key_value(&SheetStore::new(), &input),
            Err(ConvertError::UnknownValueSet { .. })
        ));
    }

    // Key-value cells are labelled `<sheet>:<key>` rather than by the sheet
    // alone, so the failing row can be found from the message.
    #[test]
    fn test_cell_error_names_the_key() {
        let header = header(&["key", "type", "value"]);
        let rows = rows(&[&[("key", "speed"), ("type", "int"), ("value", "fast")]]);
        let input = SheetInput {
            name: "config",
            header: &header,
            rows: &rows,
            key: None,
        };

        let err = convert_key_value(&SheetStore::new(), &input).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Cell { ref column, row: 0, .. } if column == "config:speed"
        ));
    }
}
