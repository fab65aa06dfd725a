use crate::cell::CellValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Header given to a column whose title cell is blank.
///
/// Further blank titles are suffixed: `__EMPTY_1`, `__EMPTY_2`, ...
pub const EMPTY_HEADER: &str = "__EMPTY";

/// One data row: column header -> raw cell value.
///
/// Only cells holding a value are present; a missing key means the cell was empty.
pub type RawRow = IndexMap<String, CellValue>;

/// Options applied when a grid of cells is turned into header-keyed rows
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Drop rows whose cells are all empty (default: true)
    pub skip_blank_rows: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            skip_blank_rows: true,
        }
    }
}

impl ReadOptions {
    /// Set whether fully blank rows are dropped
    #[must_use]
    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }
}

/// A sheet as a list of header-keyed rows, the first grid row being the headers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawSheet {
    /// Create a sheet from already keyed rows
    #[must_use]
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        RawSheet {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Build a sheet from a grid whose first row holds the column titles
    ///
    /// # Example
    /// ```
    /// use sheetsync_sheet::{CellValue, RawSheet, ReadOptions};
    ///
    /// let sheet = RawSheet::from_grid(
    ///     "items",
    ///     vec![
    ///         vec!["id".into(), CellValue::Empty],
    ///         vec!["1".into(), "note".into()],
    ///     ],
    ///     &ReadOptions::default(),
    /// );
    ///
    /// assert_eq!(sheet.headers(), ["id", "__EMPTY"]);
    /// assert_eq!(sheet.row_count(), 1);
    /// ```
    #[must_use]
    pub fn from_grid(name: &str, grid: Vec<Vec<CellValue>>, options: &ReadOptions) -> Self {
        let mut grid = grid.into_iter();
        let Some(title_row) = grid.next() else {
            return RawSheet::new(name, Vec::new(), Vec::new());
        };

        let mut data: Vec<Vec<CellValue>> = grid.collect();
        let width = data
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(title_row.len()))
            .max()
            .unwrap_or(0);

        let headers = synthesize_headers(&title_row, width);

        let mut rows = Vec::with_capacity(data.len());
        for cells in &mut data {
            if options.skip_blank_rows && cells.iter().all(is_blank) {
                continue;
            }

            let mut row = RawRow::new();
            for (header, cell) in headers.iter().zip(cells.drain(..)) {
                if !cell.is_empty() {
                    row.insert(header.clone(), cell);
                }
            }
            rows.push(row);
        }

        RawSheet::new(name, headers, rows)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Column titles in sheet order, placeholders included
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, header row excluded
    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row index and column title
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

fn is_blank(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty => true,
        CellValue::Text(s) => s.is_empty(),
        _ => false,
    }
}

/// Name every column, giving blank titles a placeholder and de-duplicating
/// repeated titles with a `_<n>` suffix.
fn synthesize_headers(title_row: &[CellValue], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(width);

    for col in 0..width {
        let title = match title_row.get(col) {
            Some(cell) if !is_blank(cell) => cell.to_raw_string(),
            _ => EMPTY_HEADER.to_string(),
        };

        let header = match seen.get(&title).copied() {
            None => {
                seen.insert(title.clone(), 1);
                title
            }
            Some(mut counter) => {
                let mut candidate = format!("{title}_{counter}");
                counter += 1;
                while seen.contains_key(&candidate) {
                    candidate = format!("{title}_{counter}");
                    counter += 1;
                }
                seen.insert(title, counter);
                seen.insert(candidate.clone(), 1);
                candidate
            }
        };
        headers.push(header);
    }

    headers
}
