//! Error definition build errors and range warnings

use crate::logging::{codes, Code};
use crate::model::{ArgumentType, LocaleTag, ModelError, TextField};
use crate::template::TemplateError;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid error code '{code}': {reason}")]
    InvalidCode { code: String, reason: String },

    #[error("Duplicate error code '{code}'")]
    DuplicateCode { code: String },

    #[error("The {field} of error '{code}' is empty")]
    EmptyField { code: String, field: TextField },

    #[error("The {field} of error '{code}' is not valid text")]
    InvalidText { code: String, field: TextField },

    #[error("Protocol code of error '{code}' must not be OK")]
    SuccessProtocolCode { code: String },

    #[error("Invalid protocol code for error '{code}': {source}")]
    InvalidStatusCode {
        code: String,
        #[source]
        source: ModelError,
    },

    #[error("Status code of error '{code}' is out of range: {detail}")]
    StatusCodeOutOfRange { code: String, detail: String },

    #[error("Invalid argument in error '{code}': {source}")]
    InvalidArgument {
        code: String,
        #[source]
        source: ModelError,
    },

    #[error("Duplicate argument '{name}' in error '{code}'")]
    DuplicateArgument { code: String, name: String },

    #[error("Localization of error '{code}' translates undeclared argument '{name}'")]
    UnknownLocalizedArgument { code: String, name: String },

    #[error("Deprecation notice of error '{code}' is empty, so it must not have translations")]
    OrphanDeprecationTranslation { code: String },

    #[error("The {field} of error '{code}' for locale {locale} is not a valid template: {source}")]
    InvalidTemplate {
        code: String,
        field: TextField,
        locale: LocaleTag,
        #[source]
        source: TemplateError,
    },

    #[error("The {field} of error '{code}' for locale {locale} references undeclared argument '{name}' at {span}")]
    UndeclaredArgument {
        code: String,
        field: TextField,
        locale: LocaleTag,
        name: String,
        span: Span,
    },

    #[error("Argument '{name}' of error '{code}' is declared as {declared} but the {field} for locale {locale} uses it as {inferred}")]
    ArgumentTypeConflict {
        code: String,
        name: String,
        declared: ArgumentType,
        inferred: ArgumentType,
        field: TextField,
        locale: LocaleTag,
    },

    #[error("Argument '{name}' of error '{code}' is used as {first} and as {second} (the {field} for locale {locale})")]
    InferredTypeConflict {
        code: String,
        name: String,
        first: ArgumentType,
        second: ArgumentType,
        field: TextField,
        locale: LocaleTag,
    },

    #[error("Localization of error '{code}' is invalid: {source}")]
    Localization {
        code: String,
        #[source]
        source: ModelError,
    },

    #[error("Error '{code}' exceeds the limit of {limit} {what}")]
    LimitExceeded {
        code: String,
        what: String,
        limit: usize,
    },
}

impl BuildError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidCode { .. } => codes::builder::INVALID_ERROR_CODE,
            Self::DuplicateCode { .. } => codes::builder::DUPLICATE_ERROR_CODE,
            Self::EmptyField { .. } => codes::builder::EMPTY_REQUIRED_FIELD,
            Self::InvalidText { .. } => codes::builder::INVALID_FIELD_TEXT,
            Self::SuccessProtocolCode { .. } => codes::builder::SUCCESS_PROTOCOL_CODE,
            Self::StatusCodeOutOfRange { .. } => codes::builder::STATUS_CODE_OUT_OF_RANGE,
            Self::InvalidArgument { source, .. }
            | Self::InvalidStatusCode { source, .. }
            | Self::Localization { source, .. } => {
                source.error_code()
            }
            Self::DuplicateArgument { .. } => codes::builder::DUPLICATE_ARGUMENT,
            Self::UnknownLocalizedArgument { .. } => codes::builder::UNKNOWN_LOCALIZED_ARGUMENT,
            Self::OrphanDeprecationTranslation { .. } => {
                codes::builder::ORPHAN_DEPRECATION_TRANSLATION
            }
            Self::InvalidTemplate { .. } => codes::builder::INVALID_MESSAGE_TEMPLATE,
            Self::UndeclaredArgument { .. } => codes::builder::UNDECLARED_TEMPLATE_ARGUMENT,
            Self::ArgumentTypeConflict { .. } | Self::InferredTypeConflict { .. } => {
                codes::builder::ARGUMENT_TYPE_CONFLICT
            }
            Self::LimitExceeded { .. } => codes::builder::BUILDER_LIMIT_EXCEEDED,
        }
    }

    /// Position inside the offending template, when there is one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::InvalidTemplate { source, .. } => source.span(),
            Self::UndeclaredArgument { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// Code of the error entry that failed to build
    pub fn entry_code(&self) -> &str {
        match self {
            Self::InvalidCode { code, .. }
            | Self::DuplicateCode { code }
            | Self::EmptyField { code, .. }
            | Self::InvalidText { code, .. }
            | Self::SuccessProtocolCode { code }
            | Self::InvalidStatusCode { code, .. }
            | Self::StatusCodeOutOfRange { code, .. }
            | Self::InvalidArgument { code, .. }
            | Self::DuplicateArgument { code, .. }
            | Self::UnknownLocalizedArgument { code, .. }
            | Self::OrphanDeprecationTranslation { code }
            | Self::InvalidTemplate { code, .. }
            | Self::UndeclaredArgument { code, .. }
            | Self::ArgumentTypeConflict { code, .. }
            | Self::InferredTypeConflict { code, .. }
            | Self::Localization { code, .. }
            | Self::LimitExceeded { code, .. } => code,
        }
    }
}

/// Non-fatal finding raised while building an error definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildWarning {
    /// Protocol code beyond the standard taxonomy
    ProtocolCodeOutOfRange { code: String, value: u32 },
    /// HTTP status outside 100..=599
    HttpCodeOutOfRange { code: String, value: i32 },
}

impl BuildWarning {
    pub fn warning_code(&self) -> Code {
        match self {
            Self::ProtocolCodeOutOfRange { .. } => codes::warning::PROTOCOL_CODE_OUT_OF_RANGE,
            Self::HttpCodeOutOfRange { .. } => codes::warning::HTTP_CODE_OUT_OF_RANGE,
        }
    }

    pub fn entry_code(&self) -> &str {
        match self {
            Self::ProtocolCodeOutOfRange { code, .. } | Self::HttpCodeOutOfRange { code, .. } => {
                code
            }
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProtocolCodeOutOfRange { code, value } => write!(
                f,
                "protocol code {} of error '{}' is not in the range of standard codes",
                value, code
            ),
            Self::HttpCodeOutOfRange { code, value } => write!(
                f,
                "http code {} of error '{}' is not in the range of standard http codes",
                value, code
            ),
        }
    }
}
