//! Whole-workbook conversion driven by the meta table.

use crate::error::{ConvertError, ConvertResult};
use crate::meta::{self, MetaEntry};
use crate::options::ConvertOptions;
use crate::shape::{Format, SheetInput};
use crate::store::SheetStore;
use regex::Regex;
use serde_json::{Map, Value};
use sheetsync_sheet::{RawSheet, SheetSource};

/// Converts workbooks according to their meta table.
///
/// A converter holds no state between runs: every call to
/// [`Converter::convert`] starts from an empty [`SheetStore`].
///
/// # Example
/// ```
/// use serde_json::json;
/// use sheetsync_convert::{ConvertOptions, Converter};
/// use sheetsync_sheet::Workbook;
///
/// let book = Workbook::new()
///     .with_grid("meta", vec![vec!["name", "format"], vec!["items", "array"]])
///     .unwrap()
///     .with_grid("items", vec![vec!["id", "label"], vec!["int", "string"], vec!["1", "one"]])
///     .unwrap();
///
/// let converter = Converter::new(ConvertOptions::default()).unwrap();
/// let output = converter.convert(&book).unwrap();
/// assert_eq!(output["items"], json!([{"id": 1, "label": "one"}]));
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    empty_column: Regex,
}

impl Converter {
    /// Create a converter, validating the options.
    pub fn new(options: ConvertOptions) -> ConvertResult<Self> {
        let empty_column = options.empty_column_regex()?;
        Ok(Converter {
            options,
            empty_column,
        })
    }

    /// Options in use
    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert every sheet declared in the meta table, in declaration order.
    ///
    /// The result holds one entry per declared sheet plus the meta table's own
    /// rows. The first error aborts the run and no partial result is returned.
    pub fn convert<S: SheetSource + ?Sized>(&self, source: &S) -> ConvertResult<Map<String, Value>> {
        let meta_name = self.options.meta_table.as_str();
        let meta_sheet = available(source, meta_name)?;
        let entries = meta::read_entries(meta_sheet)?;

        tracing::info!(meta_table = meta_name, sheets = entries.len(), "converting workbook");

        let mut store = SheetStore::new();
        store.insert(meta_name, meta::rows_as_objects(meta_sheet, &self.empty_column));

        for entry in &entries {
            let value = self.convert_sheet(source, &store, entry)?;
            store.insert(&entry.name, value);
        }

        Ok(store.into_map())
    }

    fn convert_sheet<S: SheetSource + ?Sized>(
        &self,
        source: &S,
        store: &SheetStore,
        entry: &MetaEntry,
    ) -> ConvertResult<Value> {
        let sheet = available(source, &entry.name)?;
        let header = self.retained_header(sheet);

        let format: Format = entry.format.parse().map_err(|_| ConvertError::UnknownFormat {
            sheet: entry.name.clone(),
            format: entry.format.clone(),
        })?;

        tracing::debug!(
            sheet = %entry.name,
            %format,
            rows = sheet.row_count(),
            columns = header.len(),
            "converting sheet"
        );

        let input = SheetInput {
            name: &entry.name,
            header: &header,
            rows: sheet.rows(),
            key: entry.key.as_deref(),
        };
        format.convert(store, &input, &self.options)
    }

    /// Column titles minus the placeholders of blank title cells.
    fn retained_header(&self, sheet: &RawSheet) -> Vec<String> {
        sheet
            .headers()
            .iter()
            .filter(|title| !self.empty_column.is_match(title))
            .cloned()
            .collect()
    }
}

/// Convert a workbook with default options and the given meta table name.
///
/// # Errors
///
/// Returns the first conversion error encountered.
pub fn convert<S: SheetSource + ?Sized>(
    source: &S,
    meta_table: &str,
) -> ConvertResult<Map<String, Value>> {
    Converter::new(ConvertOptions::default().with_meta_table(meta_table))?.convert(source)
}

fn available<'a, S: SheetSource + ?Sized>(source: &'a S, name: &str) -> ConvertResult<&'a RawSheet> {
    source
        .raw_sheet(name)
        .filter(|sheet| !sheet.is_empty())
        .ok_or_else(|| ConvertError::SheetUnavailable {
            name: name.to_string(),
        })
}
