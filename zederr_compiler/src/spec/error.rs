//! Specification assembly errors

use crate::builder::BuildError;
use crate::logging::{codes, Code};
use crate::model::ModelError;

pub type SpecResult<T> = Result<T, SpecError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("Unsupported specification version '{version}'; supported: {supported}")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Invalid default locale: {source}")]
    InvalidDefaultLocale {
        #[source]
        source: ModelError,
    },

    #[error("Specification has no error entries")]
    Empty,

    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("Invalid namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    #[error("Error entry #{index} '{code}' is invalid: {source}")]
    Entry {
        index: usize,
        code: String,
        #[source]
        source: BuildError,
    },

    #[error("Specification exceeds the limit of {limit} {what}")]
    LimitExceeded { what: String, limit: usize },
}

impl SpecError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnsupportedVersion { .. } => codes::spec::UNSUPPORTED_SPEC_VERSION,
            Self::InvalidDefaultLocale { .. } => codes::spec::INVALID_DEFAULT_LOCALE,
            Self::Empty => codes::spec::EMPTY_SPECIFICATION,
            Self::InvalidDomain { .. } => codes::spec::INVALID_DOMAIN,
            Self::InvalidNamespace { .. } => codes::spec::INVALID_NAMESPACE,
            Self::Entry { .. } => codes::spec::ENTRY_BUILD_FAILURE,
            Self::LimitExceeded { .. } => codes::spec::SPEC_LIMIT_EXCEEDED,
        }
    }

    /// The build failure behind an entry error
    pub fn entry_error(&self) -> Option<&BuildError> {
        match self {
            Self::Entry { source, .. } => Some(source),
            _ => None,
        }
    }
}
