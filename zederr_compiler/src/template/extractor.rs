//! Field extraction
//!
//! Walks a parsed template and recovers the named arguments it references,
//! together with the type named by any marker function around them. Markers are
//! stripped from the runtime template, which keeps only bare field references.
//!
//! Two surface forms carry a type:
//!
//! * pre-field: `{{ string .Name }}`
//! * post-field: `{{ .Name | string }}`
//!
//! Only the first two commands of a pipeline are interpreted.

use super::ast::{Arg, Node, Pipeline, Tree};
use super::error::{TemplateError, TemplateResult};
use super::TemplateOptions;
use crate::model::ArgumentType;
use crate::utils::Span;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField {
    pub name: String,
    pub field_type: ArgumentType,
    /// Location of the first reference
    pub span: Span,
}

/// Fields referenced by one template, plus the marker-free template text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub fields: BTreeMap<String, ExtractedField>,
    pub runtime_template: String,
}

impl Extraction {
    pub fn field_type(&self, name: &str) -> Option<ArgumentType> {
        self.fields.get(name).map(|field| field.field_type)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

struct Extractor<'a> {
    options: &'a TemplateOptions,
    extraction: Extraction,
}

pub fn extract(tree: &Tree, options: &TemplateOptions) -> TemplateResult<Extraction> {
    let mut extractor = Extractor {
        options,
        extraction: Extraction::default(),
    };
    extractor.visit(&tree.root)?;
    Ok(extractor.extraction)
}

impl<'a> Extractor<'a> {
    fn visit(&mut self, node: &Node) -> TemplateResult<()> {
        match node {
            Node::Text { text, .. } => self.extraction.runtime_template.push_str(text),
            Node::List { nodes, .. } => {
                for child in nodes {
                    self.visit(child)?;
                }
            }
            Node::Action { pipeline, .. } => match extract_pipeline(pipeline)? {
                Some(field) => {
                    let out = &mut self.extraction.runtime_template;
                    out.push_str(&self.options.left_delimiter);
                    out.push('.');
                    out.push_str(&field.name);
                    out.push_str(&self.options.right_delimiter);
                    self.record(field)?;
                }
                None => node.render(
                    &self.options.left_delimiter,
                    &self.options.right_delimiter,
                    &mut self.extraction.runtime_template,
                ),
            },
        }
        Ok(())
    }

    fn record(&mut self, field: ExtractedField) -> TemplateResult<()> {
        match self.extraction.fields.get_mut(&field.name) {
            Some(existing) => {
                let unified = existing.field_type.unify(field.field_type).ok_or_else(|| {
                    TemplateError::ConflictingFieldType {
                        name: field.name.clone(),
                        first: existing.field_type,
                        second: field.field_type,
                        span: field.span,
                    }
                })?;
                existing.field_type = unified;
            }
            None => {
                self.extraction.fields.insert(field.name.clone(), field);
            }
        }
        Ok(())
    }
}

/// Field referenced by an action, or None when the action does not start with one
fn extract_pipeline(pipeline: &Pipeline) -> TemplateResult<Option<ExtractedField>> {
    let Some(first_command) = pipeline.commands.first() else {
        return Ok(None);
    };

    let (mut name, mut span, mut field_type) = match first_command.args.first() {
        Some(Arg::Field { segments, span }) => (single_segment(segments, *span)?, *span, None),
        Some(Arg::Identifier { name: marker, span: marker_span }) => {
            let field_type = marker_type(marker, *marker_span)?;
            match first_command.args.get(1) {
                Some(Arg::Field { segments, span }) => {
                    (single_segment(segments, *span)?, *span, Some(field_type))
                }
                _ => {
                    return Err(TemplateError::MissingFieldName {
                        marker: marker.clone(),
                        span: *marker_span,
                    })
                }
            }
        }
        _ => return Ok(None),
    };

    if let Some(head) = pipeline.commands.get(1).and_then(|command| command.args.first()) {
        match (field_type, head) {
            (Some(_), Arg::Field { segments, span: field_span }) => {
                name = single_segment(segments, *field_span)?;
                span = *field_span;
            }
            // a repeated marker after a pre-field marker must agree with it
            (Some(first), Arg::Identifier { name: marker, span: marker_span }) => {
                let second = marker_type(marker, *marker_span)?;
                if first.unify(second).is_none() {
                    return Err(TemplateError::ConflictingFieldType {
                        name,
                        first,
                        second,
                        span: *marker_span,
                    });
                }
            }
            (Some(_), other) => {
                return Err(TemplateError::ExpectedFieldReference {
                    found: other.to_string(),
                    span: other.span(),
                })
            }
            (None, Arg::Identifier { name: marker, span: marker_span }) => {
                field_type = Some(marker_type(marker, *marker_span)?);
            }
            (None, other) => {
                return Err(TemplateError::ExpectedTypeMarker {
                    field: name,
                    found: other.to_string(),
                    span: other.span(),
                })
            }
        }
    }

    Ok(Some(ExtractedField {
        name,
        field_type: field_type.unwrap_or_default(),
        span,
    }))
}

fn single_segment(segments: &[String], span: Span) -> TemplateResult<String> {
    match segments {
        [single] => Ok(single.clone()),
        _ => Err(TemplateError::MultiSegmentField {
            field: segments.join("."),
            suggestion: segments.concat(),
            span,
        }),
    }
}

fn marker_type(marker: &str, span: Span) -> TemplateResult<ArgumentType> {
    marker
        .parse::<ArgumentType>()
        .map_err(|_| TemplateError::UnknownTypeMarker {
            marker: marker.to_string(),
            span,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::extract_fields;
    use assert_matches::assert_matches;

    fn run(source: &str) -> TemplateResult<Extraction> {
        extract_fields(source, &TemplateOptions::default())
    }

    fn types(extraction: &Extraction) -> Vec<(&str, ArgumentType)> {
        extraction
            .fields
            .values()
            .map(|field| (field.name.as_str(), field.field_type))
            .collect()
    }

    #[test]
    fn test_plain_text_is_identity() {
        for source in ["", "No arguments here.", "  padded\nlines  ", "brace { only }"] {
            let extraction = run(source).unwrap();
            assert!(extraction.is_empty());
            assert_eq!(extraction.runtime_template, source);
        }
    }

    #[test]
    fn test_bare_field_is_unknown() {
        let extraction = run("{{ .Param1 }}").unwrap();
        assert_eq!(types(&extraction), vec![("Param1", ArgumentType::Unknown)]);
        assert_eq!(extraction.runtime_template, "{{.Param1}}");
    }

    #[test]
    fn test_pre_field_marker() {
        let extraction = run("{{ string .Param1 }}").unwrap();
        assert_eq!(types(&extraction), vec![("Param1", ArgumentType::String)]);
        assert_eq!(extraction.runtime_template, "{{.Param1}}");
    }

    #[test]
    fn test_post_field_marker() {
        let extraction = run("{{ .Param1 | string }}").unwrap();
        assert_eq!(types(&extraction), vec![("Param1", ArgumentType::String)]);
        assert_eq!(extraction.runtime_template, "{{.Param1}}");
    }

    #[test]
    fn test_trailing_chain_is_inert() {
        let extraction = run("Error with {{ string .Param1 | string | int }}.").unwrap();
        assert_eq!(types(&extraction), vec![("Param1", ArgumentType::String)]);
        assert_eq!(extraction.runtime_template, "Error with {{.Param1}}.");

        let extraction = run("{{ .Count | int | string }}").unwrap();
        assert_eq!(extraction.field_type("Count"), Some(ArgumentType::Int));
    }

    #[test]
    fn test_pre_field_conflicting_second_marker_fails() {
        assert_matches!(
            run("{{ string .P | int }}"),
            Err(TemplateError::ConflictingFieldType {
                name,
                first: ArgumentType::String,
                second: ArgumentType::Int,
                ..
            }) if name == "P"
        );

        let extraction = run("{{ int .Count | int }}").unwrap();
        assert_eq!(extraction.field_type("Count"), Some(ArgumentType::Int));
    }

    #[test]
    fn test_pre_field_second_command_overrides_name() {
        let extraction = run("{{ int .Old | .New }}").unwrap();
        assert_eq!(types(&extraction), vec![("New", ArgumentType::Int)]);
        assert_eq!(extraction.runtime_template, "{{.New}}");
    }

    #[test]
    fn test_multi_segment_field_fails() {
        assert_matches!(
            run("{{ .Param1.Param2 }}"),
            Err(TemplateError::MultiSegmentField { suggestion, .. }) if suggestion == "Param1Param2"
        );
        assert_matches!(
            run("{{ string .A.B }}"),
            Err(TemplateError::MultiSegmentField { .. })
        );
    }

    #[test]
    fn test_marker_without_field() {
        assert_matches!(
            run("{{ string }}"),
            Err(TemplateError::MissingFieldName { marker, .. }) if marker == "string"
        );
        assert_matches!(
            run(r#"{{ string "x" }}"#),
            Err(TemplateError::MissingFieldName { .. })
        );
    }

    #[test]
    fn test_post_field_requires_marker() {
        assert_matches!(
            run("{{ .A | .B }}"),
            Err(TemplateError::ExpectedTypeMarker { field, found, .. }) if field == "A" && found == ".B"
        );
    }

    #[test]
    fn test_non_field_actions_pass_through() {
        let extraction = run(r#"Code {{ 42 }} and {{ "text" }}"#).unwrap();
        assert!(extraction.is_empty());
        assert_eq!(extraction.runtime_template, r#"Code {{42}} and {{"text"}}"#);
    }

    #[test]
    fn test_duplicate_names_unify() {
        let extraction = run("{{ .Id }} then {{ .Id | int }} and {{ .Id }}").unwrap();
        assert_eq!(types(&extraction), vec![("Id", ArgumentType::Int)]);
        assert_eq!(extraction.runtime_template, "{{.Id}} then {{.Id}} and {{.Id}}");

        assert_matches!(
            run("{{ .Id | int }} {{ string .Id }}"),
            Err(TemplateError::ConflictingFieldType {
                first: ArgumentType::Int,
                second: ArgumentType::String,
                ..
            })
        );
    }

    #[test]
    fn test_trim_markers_and_comments_in_runtime_text() {
        let extraction = run("Hello   {{- /* who */ -}}   {{- .Name -}} !").unwrap();
        assert_eq!(extraction.runtime_template, "Hello{{.Name}}!");
    }

    #[test]
    fn test_custom_delimiters_in_runtime_text() {
        let options = TemplateOptions {
            left_delimiter: "[[".to_string(),
            right_delimiter: "]]".to_string(),
            ..TemplateOptions::default()
        };
        let extraction = extract_fields("[[ bool .Flag ]] {{ .Ignored }}", &options).unwrap();
        assert_eq!(types(&extraction), vec![("Flag", ArgumentType::Bool)]);
        assert_eq!(extraction.runtime_template, "[[.Flag]] {{ .Ignored }}");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let source = "User {{ string .User }} failed {{ .Count | int }} times at {{ timestamp .At }}";
        let first = run(source).unwrap();
        let second = run(source).unwrap();
        assert_eq!(first, second);

        let again = run(&first.runtime_template).unwrap();
        assert_eq!(again.runtime_template, first.runtime_template);
        assert_eq!(again.field_names().collect::<Vec<_>>(), vec!["At", "Count", "User"]);
    }
}
