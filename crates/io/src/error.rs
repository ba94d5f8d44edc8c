use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported file type for '{0}' (expected .csv or .xlsx)")]
    UnsupportedFileType(String),
    #[error("{file}: text is neither UTF-8 nor BOM-marked UTF-16")]
    Encoding { file: String },
    #[error("{file}: malformed CSV: {message}")]
    Csv { file: String, message: String },
    #[error("{file}: cannot read spreadsheet: {message}")]
    Spreadsheet { file: String, message: String },
    #[error("{file}: no header row")]
    NoHeader { file: String },
    #[error("no file name starts with '{prefix}'")]
    NoPrimarySource { prefix: String },
    #[error("expected exactly 2 files, got {0}")]
    FileCount(usize),
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
