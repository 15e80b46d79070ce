use thiserror::Error;

pub type SieveResult<T> = Result<T, SieveError>;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("Workbook is not loaded yet")]
    NotReady,

    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
