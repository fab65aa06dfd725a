use super::SheetInput;
use crate::coerce::coerce;
use crate::error::ConvertResult;
use crate::path;
use crate::store::SheetStore;
use crate::types::{TypeDescriptor, TypeMap};
use serde_json::Value;
use sheetsync_sheet::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Convert every data row into an object, in row order.
///
/// Row 0 is the type row. Columns typed `ignore` (or left untyped) are
/// skipped, absent values are left out and dotted column titles nest.
pub fn convert_array(store: &SheetStore, input: &SheetInput<'_>) -> ConvertResult<Vec<Value>> {
    let Some((type_row, data)) = input.rows.split_first() else {
        return Ok(Vec::new());
    };
    let types = TypeMap::from_row(input.name, input.header, type_row);

    let mut result = Vec::with_capacity(data.len());
    for (index, row) in data.iter().enumerate() {
        let mut flat = Vec::with_capacity(input.header.len());
        for column in input.header {
            let descriptor = types.get(column);
            if *descriptor == TypeDescriptor::Ignore {
                tracing::trace!(sheet = input.name, column = %column, "column ignored");
                continue;
            }

            let raw = row.get(column).unwrap_or(&EMPTY);
            if let Some(value) = coerce(store, &input.label(column), descriptor, index, raw)? {
                flat.push((column.as_str(), value));
            }
        }
        result.push(Value::Object(path::unflatten(flat)));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::shape::test_support::{header, rows};
    use serde_json::json;

    #[test]
    fn test_rows_become_nested_objects() {
        let header = header(&["id", "stats.hp", "stats.tags", "notes"]);
        let rows = rows(&[
            &[
                ("id", "int"),
                ("stats.hp", "float"),
                ("stats.tags", "array.string"),
                ("notes", "ignore"),
            ],
            &[("id", "1"), ("stats.hp", "2.5"), ("stats.tags", r#"["a"]"#), ("notes", "x")],
            &[("id", "2")],
        ]);
        let input = SheetInput {
            name: "units",
            header: &header,
            rows: &rows,
            key: None,
        };

        let result = convert_array(&SheetStore::new(), &input).unwrap();
        assert_eq!(
            Value::Array(result),
            json!([
                {"id": 1, "stats": {"hp": 2.5, "tags": ["a"]}},
                {"id": 2, "stats": {"hp": 0, "tags": []}},
            ])
        );
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let header = header(&["id", "active"]);
        let rows = rows(&[&[("id", "string"), ("active", "bool")], &[("id", "a")]]);
        let input = SheetInput {
            name: "flags",
            header: &header,
            rows: &rows,
            key: None,
        };

        let result = convert_array(&SheetStore::new(), &input).unwrap();
        assert_eq!(result, vec![json!({"id": "a"})]);
    }

    #[test]
    fn test_error_carries_row_and_column() {
        let header = header(&["count"]);
        let rows = rows(&[&[("count", "int")], &[("count", "1")], &[("count", "many")]]);
        let input = SheetInput {
            name: "stock",
            header: &header,
            rows: &rows,
            key: None,
        };

        let err = convert_array(&SheetStore::new(), &input).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Cell { ref column, row: 1, .. } if column == "stock:count"
        ));
    }

    #[test]
    fn test_type_row_only() {
        let header = header(&["id"]);
        let rows = rows(&[&[("id", "int")]]);
        let input = SheetInput {
            name: "empty",
            header: &header,
            rows: &rows,
            key: None,
        };
        assert!(convert_array(&SheetStore::new(), &input).unwrap().is_empty());
    }
}
