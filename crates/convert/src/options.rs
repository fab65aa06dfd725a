use crate::error::{ConvertError, ConvertResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Conversion settings.
///
/// Every field has a default, so a host config file only needs to name what
/// it changes:
///
/// ```
/// use sheetsync_convert::ConvertOptions;
///
/// let options: ConvertOptions = serde_json::from_str(r#"{"meta_table": "schema"}"#).unwrap();
/// assert_eq!(options.meta_table, "schema");
/// assert_eq!(options.default_key, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Name of the sheet listing every other sheet (default: `meta`)
    pub meta_table: String,
    /// Pattern matching placeholder titles of blank header cells
    pub empty_column_pattern: String,
    /// Grouping key used when a grouped sheet declares none (default: `id`)
    pub default_key: String,
    /// Column read by single-column sheets that declare no key (default: `value`)
    pub list_key: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            meta_table: "meta".to_string(),
            empty_column_pattern: format!("^{}", sheetsync_sheet::EMPTY_HEADER),
            default_key: "id".to_string(),
            list_key: "value".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Set the meta table name
    #[must_use]
    pub fn with_meta_table(mut self, name: &str) -> Self {
        self.meta_table = name.to_string();
        self
    }

    /// Set the placeholder column pattern
    #[must_use]
    pub fn with_empty_column_pattern(mut self, pattern: &str) -> Self {
        self.empty_column_pattern = pattern.to_string();
        self
    }

    /// Set the default grouping key
    #[must_use]
    pub fn with_default_key(mut self, key: &str) -> Self {
        self.default_key = key.to_string();
        self
    }

    /// Set the default single-column key
    #[must_use]
    pub fn with_list_key(mut self, key: &str) -> Self {
        self.list_key = key.to_string();
        self
    }

    pub(crate) fn empty_column_regex(&self) -> ConvertResult<Regex> {
        Regex::new(&self.empty_column_pattern).map_err(|e| {
            ConvertError::Config(format!(
                "invalid empty column pattern `{}`: {e}",
                self.empty_column_pattern
            ))
        })
    }
}
