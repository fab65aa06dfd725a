//! # sheetsync-convert
//!
//! Schema-driven conversion of spreadsheet workbooks into JSON.
//!
//! A workbook declares its own layout in a meta table: one row per sheet to
//! convert, with the output shape (`format`) and an optional `key`. Every data
//! sheet carries a type row right under its titles that decides how each
//! column is coerced. Sheets are converted in meta table order and may
//! reference the output of sheets converted before them.
//!
//! This crate provides:
//! - Path access into nested JSON (`path`)
//! - Per-cell type coercion (`coerce`)
//! - Output shapes: array, list, csv, keyvalue and the grouped formats (`shape`)
//! - The meta-driven orchestrator (`Converter`)
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sheetsync_sheet::Workbook;
//!
//! let book = Workbook::new()
//!     .with_grid("meta", vec![
//!         vec!["name", "format", "key"],
//!         vec!["units", "dictionary", "id"],
//!         vec!["squads", "array", ""],
//!     ])
//!     .unwrap()
//!     .with_grid("units", vec![
//!         vec!["id", "hp"],
//!         vec!["string", "int"],
//!         vec!["knight", "30"],
//!     ])
//!     .unwrap()
//!     .with_grid("squads", vec![
//!         vec!["name", "leader"],
//!         vec!["string", "ref:units"],
//!         vec!["alpha", "knight"],
//!     ])
//!     .unwrap();
//!
//! let output = sheetsync_convert::convert(&book, "meta").unwrap();
//! assert_eq!(
//!     output["squads"],
//!     json!([{"name": "alpha", "leader": {"id": "knight", "hp": 30}}])
//! );
//! ```

/// Type coercion of single cells.
mod coerce;
/// Error types and result aliases.
mod error;
/// Meta table entries.
mod meta;
/// Conversion options.
mod options;
/// Dotted path access into JSON objects.
pub mod path;
/// Output shapes.
pub mod shape;
/// Converted sheets of a run.
mod store;
/// Column type descriptors.
mod types;
/// Workbook orchestration.
mod workbook;

/// Re-export cell coercion.
pub use coerce::{coerce, number_value};
/// Re-export error types.
pub use error::{ConvertError, ConvertResult, ErrorCategory};
/// Re-export meta table helpers.
pub use meta::{read_entries, MetaEntry};
/// Re-export conversion options.
pub use options::ConvertOptions;
/// Re-export the sheet store.
pub use store::SheetStore;
/// Re-export type descriptors.
pub use types::{ElementType, TypeDescriptor, TypeMap};
/// Re-export shape selection.
pub use shape::{Format, GroupMode, SheetInput};
/// Re-export the orchestrator.
pub use workbook::{convert, Converter};
