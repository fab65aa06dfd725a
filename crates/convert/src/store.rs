use serde_json::{Map, Value};

/// Outputs of the sheets converted so far in one run, in conversion order.
///
/// References can only reach sheets already in the store, so the meta table
/// order is also the dependency order.
#[derive(Debug, Clone, Default)]
pub struct SheetStore {
    sheets: Map<String, Value>,
}

impl SheetStore {
    #[must_use]
    pub fn new() -> Self {
        SheetStore::default()
    }

    /// Converted value of a sheet
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.sheets.get(name)
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.sheets.insert(name.to_string(), value);
    }

    /// Consume the store, returning every converted sheet
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.sheets
    }
}

impl FromIterator<(String, Value)> for SheetStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        SheetStore {
            sheets: iter.into_iter().collect(),
        }
    }
}
