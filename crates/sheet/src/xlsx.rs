use crate::book::Workbook;
use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::{RawSheet, ReadOptions};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#ERROR: {e:?}")),
    }
}

fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    range
        .rows()
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect()
}

fn read_all<R, RS>(workbook: &mut R, options: &ReadOptions) -> Result<Workbook>
where
    RS: Read + Seek,
    R: Reader<RS>,
    crate::error::SheetError: From<R::Error>,
{
    let sheet_names = workbook.sheet_names();
    let mut book = Workbook::new();

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name)?;
        let sheet = RawSheet::from_grid(&sheet_name, range_to_grid(&range), options);
        book.add_sheet(&sheet_name, sheet)?;
    }

    Ok(book)
}

impl Workbook {
    /// Load every sheet of a spreadsheet file (xlsx, xlsm, xlsb, xls or ods)
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or a sheet cannot be read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_xlsx_with_options(path, &ReadOptions::default())
    }

    /// Load every sheet of a spreadsheet file with options
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or a sheet cannot be read.
    pub fn from_xlsx_with_options<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let book = read_all(&mut workbook, options)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            sheets = book.sheet_count(),
            "loaded workbook"
        );
        Ok(book)
    }

    /// Decode a spreadsheet container already held in memory
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a recognised spreadsheet container.
    pub fn from_xlsx_bytes(bytes: Vec<u8>, options: &ReadOptions) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        read_all(&mut workbook, options)
    }
}
