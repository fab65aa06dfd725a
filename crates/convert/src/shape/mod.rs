//! Output shapes a sheet can be converted into.
//!
//! The meta table picks one per sheet through its `format` column. The set is
//! closed: an unknown format name is a schema error.

mod array;
mod column;
mod grouped;
mod keyvalue;
mod text;

pub use array::convert_array;
pub use column::convert_column;
pub use grouped::{convert_grouped, group_by, GroupMode};
pub use keyvalue::convert_key_value;
pub use text::convert_csv;

use crate::error::ConvertResult;
use crate::options::ConvertOptions;
use crate::store::SheetStore;
use serde_json::Value;
use sheetsync_sheet::RawRow;
use std::fmt;
use std::str::FromStr;

/// One sheet, ready for a shape converter.
#[derive(Debug, Clone, Copy)]
pub struct SheetInput<'a> {
    /// Sheet name, used in error labels and as reference target name
    pub name: &'a str,
    /// Retained column titles, placeholders removed
    pub header: &'a [String],
    /// All rows; row 0 is the type row for typed shapes
    pub rows: &'a [RawRow],
    /// Key declared in the meta table, if any
    pub key: Option<&'a str>,
}

impl SheetInput<'_> {
    /// Label used for a column in error messages
    #[must_use]
    pub fn label(&self, column: &str) -> String {
        format!("{}:{}", self.name, column)
    }
}

/// Output shape declared for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `array`: one object per row
    Array,
    /// `csv`: the raw rows as comma-joined text
    Csv,
    /// `list`: the typed values of one column
    List,
    /// `dictionary`, `mappedlist`, `mappedfirst`, `mappedvalues`, with an
    /// optional `*` suffix that strips the key attributes
    Grouped { mode: GroupMode, remove_key: bool },
    /// `keyvalue`: rows of key, type and value(s)
    KeyValue,
}

/// Error returned when a format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let (base, remove_key) = match name.strip_suffix('*') {
            Some(base) => (base, true),
            None => (name, false),
        };

        let grouped = |mode| Format::Grouped { mode, remove_key };
        let format = match base {
            "array" if !remove_key => Format::Array,
            "csv" if !remove_key => Format::Csv,
            "list" if !remove_key => Format::List,
            "keyvalue" if !remove_key => Format::KeyValue,
            "dictionary" => grouped(GroupMode::Dictionary),
            "mappedlist" => grouped(GroupMode::List),
            "mappedfirst" => grouped(GroupMode::First),
            "mappedvalues" => grouped(GroupMode::Values),
            _ => return Err(UnknownFormat(name.to_string())),
        };
        Ok(format)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Array => write!(f, "array"),
            Format::Csv => write!(f, "csv"),
            Format::List => write!(f, "list"),
            Format::KeyValue => write!(f, "keyvalue"),
            Format::Grouped { mode, remove_key } => {
                write!(f, "{mode}{}", if *remove_key { "*" } else { "" })
            }
        }
    }
}

impl Format {
    /// Convert one sheet into this shape.
    pub fn convert(
        self,
        store: &SheetStore,
        input: &SheetInput<'_>,
        options: &ConvertOptions,
    ) -> ConvertResult<Value> {
        match self {
            Format::Array => Ok(Value::Array(convert_array(store, input)?)),
            Format::Csv => Ok(convert_csv(input)),
            Format::List => {
                let key = input.key.unwrap_or(options.list_key.as_str());
                convert_column(store, input, key)
            }
            Format::Grouped { mode, remove_key } => {
                let key = input.key.unwrap_or(options.default_key.as_str());
                let keys: Vec<&str> = key.split(':').collect();
                convert_grouped(store, input, &keys, mode, remove_key)
            }
            Format::KeyValue => convert_key_value(store, input),
        }
    }
}
