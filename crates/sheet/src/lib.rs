//! Raw sheet extraction for sheetsync
//!
//! Turns spreadsheet containers (xlsx, xls, ods, CSV) into header-keyed rows of
//! loosely typed cells. This is the boundary between the spreadsheet world and
//! the schema-driven converter: nothing here knows about types, references or
//! output shapes.
//!
//! # Examples
//!
//! ## Building a workbook in memory
//!
//! ```
//! use sheetsync_sheet::{CellValue, SheetSource, Workbook};
//!
//! let book = Workbook::new()
//!     .with_grid("items", vec![
//!         vec!["id", "label"],
//!         vec!["int", "string"],
//!         vec!["1", "first"],
//!     ])
//!     .unwrap();
//!
//! let items = book.raw_sheet("items").unwrap();
//! assert_eq!(items.row_count(), 2);
//! assert_eq!(items.cell(1, "label"), Some(&CellValue::from("first")));
//! ```
//!
//! ## Loading from a file
//!
//! ```no_run
//! use sheetsync_sheet::Workbook;
//!
//! let book = Workbook::from_xlsx("game_data.xlsx").unwrap();
//! ```
//!
//! # Header conventions
//!
//! The first row of every sheet holds the column titles. Blank titles are
//! replaced by `__EMPTY`, `__EMPTY_1`, ... and repeated titles get a `_<n>`
//! suffix, so every column has a unique key. Rows only contain the cells that
//! actually hold a value.

mod book;
mod cell;
mod csv;
mod error;
mod sheet;
#[cfg(not(target_arch = "wasm32"))]
mod xlsx;

/// Re-export workbook types.
pub use book::{SheetSource, Workbook};
/// Re-export cell value type.
pub use cell::{format_number, CellValue};
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export raw sheet types.
pub use sheet::{RawRow, RawSheet, ReadOptions, EMPTY_HEADER};
