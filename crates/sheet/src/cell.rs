use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw cell value as it comes out of a spreadsheet, before any typing.
///
/// Spreadsheet containers only know about four kinds of cell content: nothing,
/// booleans, numbers (dates included, as serial numbers) and text. Everything
/// richer is produced later by the converter from a type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Check if the cell holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell would be falsy in a spreadsheet script:
    /// empty, `""`, `0`, `NaN` or `false`.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Bool(b) => !b,
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Text(s) => s.is_empty(),
        }
    }

    /// Try to get the value as a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the text content, if this is a text cell
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Stringify the value the way a spreadsheet script would.
    ///
    /// Integral numbers print without a fractional part (`3`, not `3.0`),
    /// booleans print as `true`/`false` and empty cells as `""`.
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Format a number without a trailing `.0` for integral values.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        // -0 prints as 0
        if n == 0.0 {
            return "0".to_string();
        }
        return format!("{n:.0}");
    }
    n.to_string()
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Number(i as f64)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Number(f64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Empty,
        }
    }
}
