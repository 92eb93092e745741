//! Schema errors raised while constructing model values

use crate::logging::{codes, Code};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{field} is empty")]
    EmptyValue { field: String },

    #[error("{field} is not valid text; got {value:?}")]
    InvalidText { field: String, value: String },

    #[error("{field} '{value}' does not match the identifier grammar")]
    InvalidIdentifier { field: String, value: String },

    #[error("unknown argument type: '{value}'")]
    InvalidArgumentType { value: String },

    #[error("failed to parse locale tag '{value}': {reason}")]
    InvalidLocale { value: String, reason: String },

    #[error("unknown protocol status code '{value}'")]
    InvalidProtocolCode { value: String },

    #[error("{what} exceeds limit of {limit}")]
    LimitExceeded { what: String, limit: usize },
}

impl ModelError {
    pub fn empty_value(field: &str) -> Self {
        Self::EmptyValue {
            field: field.to_string(),
        }
    }

    pub fn invalid_text(field: &str, value: &str) -> Self {
        Self::InvalidText {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_identifier(field: &str, value: &str) -> Self {
        Self::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_locale(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLocale {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn limit_exceeded(what: &str, limit: usize) -> Self {
        Self::LimitExceeded {
            what: what.to_string(),
            limit,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::EmptyValue { .. } => codes::model::EMPTY_VALUE,
            Self::InvalidText { .. } => codes::model::INVALID_TEXT,
            Self::InvalidIdentifier { .. } => codes::model::INVALID_IDENTIFIER,
            Self::InvalidArgumentType { .. } => codes::model::INVALID_ARGUMENT_TYPE,
            Self::InvalidLocale { .. } => codes::model::INVALID_LOCALE,
            Self::InvalidProtocolCode { .. } => codes::model::INVALID_PROTOCOL_CODE,
            Self::LimitExceeded { .. } => codes::model::MODEL_LIMIT_EXCEEDED,
        }
    }
}
