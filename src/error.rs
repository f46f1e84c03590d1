use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported file format '{0}'. Please use .xlsx, .xls, .csv, or .ods files")]
    UnsupportedFormat(String),

    #[error("No usable data: {0}")]
    EmptySource(String),

    #[error("First row does not contain any column names")]
    MissingHeader,

    #[error("Failed to read file: {0}")]
    ReadFailure(String),

    #[error("File is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Column '{0}' does not exist in the dataset")]
    UnknownColumn(String),

    #[error("Please map a name column first")]
    NoNameMapped,

    #[error("No valid contact data to export")]
    NoContactsFound,

    #[error("Serialization error: {0}")]
    SerializationFailure(String),

    #[error("Sharing failed: {0}")]
    ShareFailure(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ReadFailure(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::SerializationFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationFailure(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::SerializationFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
