//! Message template analysis
//!
//! Templates use a constrained subset of Go's `text/template` syntax. Parsing
//! produces a transient `Tree`; extraction turns it into the set of referenced
//! arguments and a runtime template with type markers stripped.

pub mod ast;
pub mod error;
pub mod extractor;
pub mod lexer;
pub mod parser;

pub use ast::{Arg, Command, Node, Pipeline, Tree};
pub use error::{TemplateError, TemplateResult};
pub use extractor::{ExtractedField, Extraction};

use crate::config::runtime::{TemplatePreferences, DEFAULT_TYPE_MARKERS};
use std::collections::BTreeSet;

/// Delimiters and marker functions a template is parsed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    pub left_delimiter: String,
    pub right_delimiter: String,
    pub type_markers: BTreeSet<String>,
    pub debug_parse_trees: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            left_delimiter: "{{".to_string(),
            right_delimiter: "}}".to_string(),
            type_markers: DEFAULT_TYPE_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            debug_parse_trees: false,
        }
    }
}

impl TemplateOptions {
    pub fn from_preferences(preferences: &TemplatePreferences) -> Self {
        Self {
            left_delimiter: preferences.left_delimiter.clone(),
            right_delimiter: preferences.right_delimiter.clone(),
            type_markers: preferences.type_markers.iter().cloned().collect(),
            debug_parse_trees: preferences.debug_parse_trees,
        }
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if self.left_delimiter.is_empty() || self.right_delimiter.is_empty() {
            return Err(TemplateError::InvalidDelimiters {
                left: self.left_delimiter.clone(),
                right: self.right_delimiter.clone(),
            });
        }
        Ok(())
    }
}

pub fn parse(source: &str, options: &TemplateOptions) -> TemplateResult<Tree> {
    parser::parse_template(source, options)
}

/// Parse `source` and extract the fields it references
pub fn extract_fields(source: &str, options: &TemplateOptions) -> TemplateResult<Extraction> {
    let tree = parse(source, options)?;
    extractor::extract(&tree, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArgumentType;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_options() {
        let options = TemplateOptions::default();
        assert_eq!(options.left_delimiter, "{{");
        assert!(options.type_markers.contains("timestamp"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_from_preferences() {
        let preferences = TemplatePreferences {
            left_delimiter: "<<".to_string(),
            right_delimiter: ">>".to_string(),
            debug_parse_trees: true,
            type_markers: vec!["int".to_string()],
        };
        let options = TemplateOptions::from_preferences(&preferences);

        let extraction = extract_fields("n=<< int .N >>", &options).unwrap();
        assert_eq!(extraction.field_type("N"), Some(ArgumentType::Int));
        assert_eq!(extraction.runtime_template, "n=<<.N>>");

        assert_matches!(
            extract_fields("<< string .N >>", &options),
            Err(TemplateError::UndefinedFunction { .. })
        );
    }

    #[test]
    fn test_errors_carry_positions() {
        let error = extract_fields("first line\nsecond {{ .A.B }}", &TemplateOptions::default())
            .unwrap_err();
        let span = error.span().unwrap();
        assert_eq!((span.start.line, span.start.column), (2, 11));
        assert!(error.format_with_source("first line\nsecond {{ .A.B }}").contains("2 | second"));
    }
}
