//! Document loading errors

use crate::logging::{codes, Code};
use crate::spec::SpecError;

pub type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("Unsupported document format: expected .toml or .json, found {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    #[error("Failed to parse {format} document: {message}")]
    Parse { format: String, message: String },

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl InputError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileNotFound { .. } => codes::input::FILE_NOT_FOUND,
            Self::EmptyFile { .. } => codes::input::EMPTY_FILE,
            Self::FileTooLarge { .. } => codes::input::FILE_TOO_LARGE,
            Self::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            Self::UnsupportedFormat { .. } => codes::input::UNSUPPORTED_FORMAT,
            Self::Parse { .. } => codes::input::DOCUMENT_PARSE_ERROR,
            Self::Io { .. } => codes::input::IO_ERROR,
            Self::Spec(error) => error.error_code(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
