//! Column type descriptors and the per-sheet type row.

use indexmap::IndexMap;
use sheetsync_sheet::{CellValue, RawRow};
use std::fmt;

/// Element type of a typed array column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Any,
    Int,
    Float,
    String,
    Bool,
}

/// What a column holds, as declared by a type descriptor like `int`,
/// `array.string` or `ref:units`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Column is never materialized.
    Ignore,
    Any,
    String,
    Float,
    Int,
    Bool,
    Array(ElementType),
    Json,
    /// Key into another sheet; without a target the cell holds `sheet:key`.
    Ref { sheet: Option<String> },
    /// JSON array of keys into another sheet.
    ArrayRef { sheet: Option<String> },
}

impl TypeDescriptor {
    /// Parse a descriptor of the form `base` or `base:target`.
    ///
    /// The target only matters for references; other bases ignore it.
    /// Returns `None` for an unknown base.
    #[must_use]
    pub fn parse(descriptor: &str) -> Option<Self> {
        let (base, target) = match descriptor.split_once(':') {
            Some((base, target)) => (base.trim(), Some(target.trim())),
            None => (descriptor.trim(), None),
        };
        let sheet = target.filter(|t| !t.is_empty()).map(str::to_string);

        let parsed = match base {
            "ignore" => Self::Ignore,
            "any" => Self::Any,
            "string" => Self::String,
            "float" => Self::Float,
            "int" | "integer" => Self::Int,
            "bool" | "boolean" => Self::Bool,
            "array" => Self::Array(ElementType::Any),
            "array.int" => Self::Array(ElementType::Int),
            "array.float" => Self::Array(ElementType::Float),
            "array.string" => Self::Array(ElementType::String),
            "array.bool" => Self::Array(ElementType::Bool),
            "json" => Self::Json,
            "ref" | "reference" => Self::Ref { sheet },
            "array.ref" | "array.reference" => Self::ArrayRef { sheet },
            _ => return None,
        };
        Some(parsed)
    }

    /// Parse the descriptor held by a type-row cell.
    ///
    /// An empty cell means the column carries no type and is skipped. So is a
    /// column whose descriptor is not recognised, with a warning.
    #[must_use]
    pub fn from_cell(column: &str, cell: Option<&CellValue>) -> Self {
        let text = match cell {
            None | Some(CellValue::Empty) => return Self::Ignore,
            Some(CellValue::Text(text)) if text.trim().is_empty() => return Self::Ignore,
            Some(other) => other.to_raw_string(),
        };
        Self::parse(&text).unwrap_or_else(|| {
            tracing::warn!(column, descriptor = %text, "unknown type, column skipped");
            Self::Ignore
        })
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Any => "any",
            ElementType::Int | ElementType::Float => "number",
            ElementType::String => "string",
            ElementType::Bool => "boolean",
        };
        write!(f, "{name}")
    }
}

static IGNORED: TypeDescriptor = TypeDescriptor::Ignore;

/// Declared type of every retained column of one sheet, read from its first data row.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeMap {
    /// Read the type row of `sheet` for the given columns.
    #[must_use]
    pub fn from_row(sheet: &str, header: &[String], row: &RawRow) -> Self {
        let mut types = IndexMap::with_capacity(header.len());
        for column in header {
            let label = format!("{sheet}:{column}");
            let descriptor = TypeDescriptor::from_cell(&label, row.get(column));
            types.insert(column.clone(), descriptor);
        }
        TypeMap { types }
    }

    /// Type of a column; columns outside the map are ignored.
    #[must_use]
    pub fn get(&self, column: &str) -> &TypeDescriptor {
        self.types.get(column).unwrap_or(&IGNORED)
    }
}
