use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::{RawSheet, ReadOptions};
use indexmap::IndexMap;

/// Anything that can hand out raw sheets by name.
///
/// The converter only needs read access to already decoded sheets; how the
/// workbook was obtained (file, download, in-memory fixture) is up to the
/// implementor.
pub trait SheetSource {
    /// Look up a sheet by name
    fn raw_sheet(&self, name: &str) -> Option<&RawSheet>;
}

/// A decoded workbook: raw sheets keyed by name (preserves insertion order)
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: IndexMap<String, RawSheet>,
}

impl Workbook {
    /// Create a new empty workbook
    #[must_use]
    pub fn new() -> Self {
        Workbook::default()
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&RawSheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &RawSheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add a sheet to the workbook
    pub fn add_sheet(&mut self, name: &str, sheet: RawSheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Add a sheet from a grid whose first row holds the column titles
    pub fn add_grid(
        &mut self,
        name: &str,
        grid: Vec<Vec<CellValue>>,
        options: &ReadOptions,
    ) -> Result<()> {
        self.add_sheet(name, RawSheet::from_grid(name, grid, options))
    }

    /// Builder-style variant of [`Workbook::add_grid`] for anything convertible
    /// into cells, with default read options
    ///
    /// # Example
    /// ```
    /// use sheetsync_sheet::Workbook;
    ///
    /// let book = Workbook::new()
    ///     .with_grid("meta", vec![vec!["name", "format"], vec!["items", "array"]])
    ///     .unwrap();
    ///
    /// assert!(book.has_sheet("meta"));
    /// ```
    pub fn with_grid<T: Into<CellValue>>(mut self, name: &str, grid: Vec<Vec<T>>) -> Result<Self> {
        let grid = grid
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.add_grid(name, grid, &ReadOptions::default())?;
        Ok(self)
    }
}

impl SheetSource for Workbook {
    fn raw_sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut book = Workbook::new();
        book.add_sheet("First", RawSheet::default()).unwrap();
        book.add_sheet("Second", RawSheet::default()).unwrap();

        assert_eq!(book.sheet_count(), 2);
        assert_eq!(book.sheet_names(), vec!["First", "Second"]);
        assert_eq!(book.sheet("Second").unwrap().name(), "Second");
        assert!(book.raw_sheet("Third").is_none());
    }

    #[test]
    fn test_duplicate_sheet() {
        let mut book = Workbook::new();
        book.add_sheet("Data", RawSheet::default()).unwrap();
        let result = book.add_sheet("Data", RawSheet::default());
        assert!(matches!(result, Err(SheetError::SheetAlreadyExists { .. })));
    }

    #[test]
    fn test_missing_sheet() {
        let book = Workbook::new();
        assert!(matches!(
            book.sheet("nope"),
            Err(SheetError::SheetNotFound { name }) if name == "nope"
        ));
    }

    #[test]
    fn test_with_grid() {
        let book = Workbook::new()
            .with_grid("s", vec![vec!["a", "b"], vec!["1", "2"]])
            .unwrap();
        let sheet = book.sheet("s").unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.cell(0, "b"), Some(&CellValue::from("2")));
    }
}
