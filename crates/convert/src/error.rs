//! Error types for workbook conversion.

use sheetsync_sheet::{CellValue, SheetError};
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Broad class of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A single cell could not be coerced to its declared type.
    CellConversion,
    /// A declared sheet is missing or has no rows.
    SheetAvailability,
    /// The meta table names something that does not exist.
    Schema,
    /// The underlying workbook could not be read.
    Source,
}

/// Errors that abort a workbook conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A cell failed type coercion.
    #[error("{message} [column= {column} row= {row} ] data={data}")]
    Cell {
        message: String,
        column: String,
        row: usize,
        data: String,
    },

    /// A reference names a sheet that has not been converted (yet).
    #[error("Referenced sheet `{sheet}` is not converted yet [column= {column} row= {row} ] data={data}")]
    MissingReference {
        sheet: String,
        column: String,
        row: usize,
        data: String,
    },

    /// A declared sheet does not exist or is empty.
    #[error("sheetName={name} does not exist or empty")]
    SheetUnavailable { name: String },

    /// The meta table declares a format no converter handles.
    #[error("Unknown format `{format}` for sheet {sheet}")]
    UnknownFormat { sheet: String, format: String },

    /// A key-value sheet was asked for a value set it does not have.
    #[error("Sheet {sheet} has no value set `{id}`")]
    UnknownValueSet { sheet: String, id: String },

    /// A meta table row has no sheet name.
    #[error("Meta table row {row} has no sheet name")]
    MissingSheetName { row: usize },

    /// Invalid conversion options.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workbook extraction error.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl ConvertError {
    /// Create a cell conversion error for a raw value.
    pub fn cell(
        message: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        raw: &CellValue,
    ) -> Self {
        Self::Cell {
            message: message.into(),
            column: column.into(),
            row,
            data: raw_json(raw),
        }
    }

    /// Create a missing reference error.
    pub fn missing_reference(
        sheet: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        raw: &CellValue,
    ) -> Self {
        Self::MissingReference {
            sheet: sheet.into(),
            column: column.into(),
            row,
            data: raw_json(raw),
        }
    }

    /// Classify the error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Cell { .. } => ErrorCategory::CellConversion,
            Self::SheetUnavailable { .. } => ErrorCategory::SheetAvailability,
            Self::MissingReference { .. }
            | Self::UnknownFormat { .. }
            | Self::UnknownValueSet { .. }
            | Self::MissingSheetName { .. }
            | Self::Config(_) => ErrorCategory::Schema,
            Self::Sheet(_) => ErrorCategory::Source,
        }
    }
}

/// Render a raw cell the way it is shown in error messages.
fn raw_json(raw: &CellValue) -> String {
    match raw {
        CellValue::Empty => "undefined".to_string(),
        CellValue::Text(s) => serde_json::Value::String(s.clone()).to_string(),
        other => other.to_raw_string(),
    }
}
