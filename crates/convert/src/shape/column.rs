use super::SheetInput;
use crate::coerce::coerce;
use crate::error::ConvertResult;
use crate::store::SheetStore;
use crate::types::TypeMap;
use serde_json::Value;
use sheetsync_sheet::CellValue;

/// Collect the typed values of a single column, in row order.
///
/// Row 0 is the type row. Absent values become `null` so positions are kept;
/// a key that names no column yields one `null` per row.
pub fn convert_column(
    store: &SheetStore,
    input: &SheetInput<'_>,
    key: &str,
) -> ConvertResult<Value> {
    let Some((type_row, data)) = input.rows.split_first() else {
        return Ok(Value::Array(Vec::new()));
    };
    if !input.header.iter().any(|title| title == key) {
        tracing::warn!(sheet = input.name, key, "list key names no column");
    }
    let column = [key.to_string()];
    let types = TypeMap::from_row(input.name, &column, type_row);
    let descriptor = types.get(key);
    let label = input.label(key);

    let mut values = Vec::with_capacity(data.len());
    for (index, row) in data.iter().enumerate() {
        let raw = row.get(key).cloned().unwrap_or(CellValue::Empty);
        let value = coerce(store, &label, descriptor, index, &raw)?;
        values.push(value.unwrap_or(Value::Null));
    }
    Ok(Value::Array(values))
}
