//! Template syntax and field extraction errors

use crate::logging::{codes, Code};
use crate::model::ArgumentType;
use crate::utils::{SourceMap, Span};

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid delimiters: left '{left}', right '{right}'")]
    InvalidDelimiters { left: String, right: String },

    #[error("Unclosed action at {span}")]
    UnterminatedAction { span: Span },

    #[error("Unterminated quoted string at {span}")]
    UnterminatedQuote { span: Span },

    #[error("Unclosed comment at {span}")]
    UnterminatedComment { span: Span },

    #[error("Unexpected character {character:?} in action at {span}")]
    UnexpectedCharacter { character: char, span: Span },

    #[error("Unsupported construct: {construct} at {span}")]
    UnsupportedConstruct { construct: String, span: Span },

    #[error("Function \"{name}\" not defined at {span}")]
    UndefinedFunction { name: String, span: Span },

    #[error("Missing value for command at {span}")]
    MissingCommand { span: Span },

    #[error("Invalid number syntax: '{text}' at {span}")]
    InvalidNumber { text: String, span: Span },

    #[error("Template {what} exceeds limit of {limit}")]
    LimitExceeded { what: String, limit: usize },

    #[error("Field '.{field}' has more than one segment at {span}; rename it to `{suggestion}`")]
    MultiSegmentField {
        field: String,
        suggestion: String,
        span: Span,
    },

    #[error("Field name was not found after type marker '{marker}' at {span}")]
    MissingFieldName { marker: String, span: Span },

    #[error("Expected a field reference after type-marked field, found '{found}' at {span}")]
    ExpectedFieldReference { found: String, span: Span },

    #[error("Expected a type marker after field '{field}', found '{found}' at {span}")]
    ExpectedTypeMarker {
        field: String,
        found: String,
        span: Span,
    },

    #[error("Type marker '{marker}' does not name an argument type at {span}")]
    UnknownTypeMarker { marker: String, span: Span },

    #[error("Field '{name}' is used as both {first} and {second} at {span}")]
    ConflictingFieldType {
        name: String,
        first: ArgumentType,
        second: ArgumentType,
        span: Span,
    },
}

impl TemplateError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidDelimiters { .. } => codes::template::INVALID_DELIMITERS,
            Self::UnterminatedAction { .. } => codes::template::UNTERMINATED_ACTION,
            Self::UnterminatedQuote { .. } => codes::template::UNTERMINATED_QUOTE,
            Self::UnterminatedComment { .. } => codes::template::UNTERMINATED_COMMENT,
            Self::UnexpectedCharacter { .. } => codes::template::UNEXPECTED_CHARACTER,
            Self::UnsupportedConstruct { .. } => codes::template::UNSUPPORTED_CONSTRUCT,
            Self::UndefinedFunction { .. } => codes::template::UNDEFINED_FUNCTION,
            Self::MissingCommand { .. } => codes::template::MISSING_COMMAND,
            Self::InvalidNumber { .. } => codes::template::INVALID_NUMBER,
            Self::LimitExceeded { .. } => codes::template::TEMPLATE_LIMIT_EXCEEDED,
            Self::MultiSegmentField { .. } => codes::template::MULTI_SEGMENT_FIELD,
            Self::MissingFieldName { .. } => codes::template::MISSING_FIELD_NAME,
            Self::ExpectedFieldReference { .. } => codes::template::EXPECTED_FIELD_REFERENCE,
            Self::ExpectedTypeMarker { .. } => codes::template::EXPECTED_TYPE_MARKER,
            Self::UnknownTypeMarker { .. } => codes::template::UNKNOWN_TYPE_MARKER,
            Self::ConflictingFieldType { .. } => codes::template::CONFLICTING_FIELD_TYPE,
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnterminatedAction { span }
            | Self::UnterminatedQuote { span }
            | Self::UnterminatedComment { span }
            | Self::UnexpectedCharacter { span, .. }
            | Self::UnsupportedConstruct { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::MissingCommand { span }
            | Self::InvalidNumber { span, .. }
            | Self::MultiSegmentField { span, .. }
            | Self::MissingFieldName { span, .. }
            | Self::ExpectedFieldReference { span, .. }
            | Self::ExpectedTypeMarker { span, .. }
            | Self::UnknownTypeMarker { span, .. }
            | Self::ConflictingFieldType { span, .. } => Some(*span),
            Self::InvalidDelimiters { .. } | Self::LimitExceeded { .. } => None,
        }
    }

    /// Syntax errors come from the parser, the rest from field extraction
    pub fn is_syntax_error(&self) -> bool {
        !matches!(
            self,
            Self::MultiSegmentField { .. }
                | Self::MissingFieldName { .. }
                | Self::ExpectedFieldReference { .. }
                | Self::ExpectedTypeMarker { .. }
                | Self::UnknownTypeMarker { .. }
                | Self::ConflictingFieldType { .. }
        )
    }

    pub fn requires_halt(&self) -> bool {
        crate::logging::codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        crate::logging::codes::is_recoverable(self.error_code().as_str())
    }

    /// Render the error against the template it came from
    pub fn format_with_source(&self, source: &str) -> String {
        match self.span() {
            Some(span) => SourceMap::new(source).format_error(&span, &self.to_string()),
            None => format!("error: {}\n", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_codes_and_spans() {
        let span = Span::new(Position::new(6, 1, 7), Position::new(10, 1, 11));
        let error = TemplateError::MultiSegmentField {
            field: "A.B".to_string(),
            suggestion: "AB".to_string(),
            span,
        };

        assert_eq!(error.error_code().as_str(), "E020");
        assert_eq!(error.span(), Some(span));
        assert!(!error.is_syntax_error());
        assert!(error.to_string().contains("rename it to `AB`"));
    }

    #[test]
    fn test_format_with_source() {
        let source = "Error {{ .A.B }}";
        let span = Span::new(Position::new(9, 1, 10), Position::new(13, 1, 14));
        let error = TemplateError::MultiSegmentField {
            field: "A.B".to_string(),
            suggestion: "AB".to_string(),
            span,
        };

        let rendered = error.format_with_source(source);
        assert!(rendered.contains("1 | Error {{ .A.B }}"));
        assert!(rendered.contains("^^^^"));

        let no_span = TemplateError::LimitExceeded {
            what: "length".to_string(),
            limit: 10,
        };
        assert!(no_span.format_with_source(source).starts_with("error: Template length"));
    }
}
