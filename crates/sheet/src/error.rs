use thiserror::Error;

/// Errors that can occur while extracting raw sheets from a workbook
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Workbook(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
