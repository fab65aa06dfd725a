use crate::book::Workbook;
use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::{RawSheet, ReadOptions};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV reader options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Row handling shared with the spreadsheet readers
    pub read: ReadOptions,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            read: ReadOptions::default(),
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the row handling options
    #[must_use]
    pub fn with_read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }
}

impl RawSheet {
    /// Load a sheet from a CSV file; the first record holds the column titles
    pub fn from_csv<P: AsRef<Path>>(name: &str, path: P, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(name, BufReader::new(file), options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(name: &str, content: &str, options: &CsvOptions) -> Result<Self> {
        Self::from_csv_reader(name, content.as_bytes(), options)
    }

    /// Load a sheet from a reader.
    ///
    /// Every non-empty field becomes a text cell; typing is left to the converter.
    pub fn from_csv_reader<R: Read>(name: &str, reader: R, options: &CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false) // titles are handled by RawSheet::from_grid
            .flexible(true)
            .from_reader(reader);

        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            grid.push(row);
        }

        Ok(RawSheet::from_grid(name, grid, &options.read))
    }
}

impl Workbook {
    /// Add a sheet parsed from CSV text
    pub fn add_csv_str(&mut self, name: &str, content: &str, options: &CsvOptions) -> Result<()> {
        let sheet = RawSheet::from_csv_str(name, content, options)?;
        self.add_sheet(name, sheet)
    }

    /// Load every `*.csv` file in a directory as a sheet named after the file stem.
    ///
    /// Sheets are added in file-name order.
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P, options: &CsvOptions) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut book = Workbook::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            tracing::debug!(sheet = name, path = %path.display(), "loading csv sheet");
            let sheet = RawSheet::from_csv(name, &path, options)?;
            book.add_sheet(name, sheet)?;
        }
        Ok(book)
    }
}
