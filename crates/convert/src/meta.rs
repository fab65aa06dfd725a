//! The meta table: one row per sheet to convert.
//!
//! Columns are looked up by title: `name`, `format` and the
//! optional `key`. The meta table has no type row.

use crate::coerce::number_value;
use crate::error::{ConvertError, ConvertResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sheetsync_sheet::{CellValue, RawRow, RawSheet};

/// One declared sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Sheet name in the workbook, also the output key
    pub name: String,
    /// Output shape, see [`crate::Format`]
    pub format: String,
    /// Grouping key, value-set id or column, depending on the format.
    /// Composite keys are colon separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MetaEntry {
    /// Read a meta table row; `index` is only used for error reporting.
    pub fn from_row(index: usize, row: &RawRow) -> ConvertResult<Self> {
        let text = |column: &str| {
            row.get(column)
                .map(|cell| cell.to_raw_string().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let name = text("name").ok_or(ConvertError::MissingSheetName { row: index })?;
        Ok(MetaEntry {
            name,
            format: text("format").unwrap_or_default(),
            key: text("key"),
        })
    }
}

/// Read every entry of the meta table, in declaration order.
pub fn read_entries(sheet: &RawSheet) -> ConvertResult<Vec<MetaEntry>> {
    sheet
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| MetaEntry::from_row(index, row))
        .collect()
}

/// The meta table's own rows as plain objects, so other sheets can reference it.
pub fn rows_as_objects(sheet: &RawSheet, empty_column: &Regex) -> Value {
    let rows = sheet
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = row
                .iter()
                .filter(|(column, _)| !empty_column.is_match(column))
                .map(|(column, cell)| (column.clone(), cell_json(cell)))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

fn cell_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Number(n) => number_value(*n),
        CellValue::Text(s) => Value::String(s.clone()),
    }
}
