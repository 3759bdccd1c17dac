use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("schema error in column {column:?}: {detail}")]
    Schema { column: String, detail: String },

    #[error("invalid season range: end {end} is before start {start}")]
    InvalidSeasonRange { start: u32, end: u32 },

    #[error("season file not found: {}", .0.display())]
    MissingSeasonFile(PathBuf),

    #[error("consistency check failed at row {row}: {detail}")]
    Consistency { row: usize, detail: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart export error: {0}")]
    Chart(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    pub(crate) fn schema(column: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Schema {
            column: column.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
