use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Git error: {0}")]
    GitError(#[from] git2::Error),

    #[error("line {line}: {reason}")]
    FormatError { line: usize, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
