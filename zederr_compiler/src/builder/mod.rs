//! Error definition builder
//!
//! One `ErrorBuilder` serves one specification build: it owns the set of codes
//! already handed out, so duplicate detection never leaks across builds.
//! Building is fail-fast. The first violation is returned and nothing of the
//! entry is kept.

pub mod error;

pub use error::{BuildError, BuildResult, BuildWarning};

use crate::config::compile_time::model::MAX_ARGUMENTS_PER_ERROR;
use crate::config::runtime::BuilderPreferences;
use crate::logging::{codes, with_entry_context};
use crate::model::naming::{self, IDENTIFIER_PATTERN};
use crate::model::{
    Argument, ArgumentType, ErrorDefinition, LocaleTag, Localization, ProtocolCode, TextField,
};
use crate::template::{self, TemplateOptions};
use crate::{log_error, log_success, log_warning};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Raw values of one error entry, as handed over by a document loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInput {
    pub code: String,
    pub grpc_code: ProtocolCode,
    pub http_code: i32,
    pub description: String,
    pub title: String,
    pub public_message: String,
    pub internal_message: String,
    pub deprecated: String,
    pub arguments: Vec<Argument>,
    pub localization: Localization,
}

impl ErrorInput {
    pub fn new(code: &str, grpc_code: ProtocolCode, http_code: i32) -> Self {
        Self {
            code: code.to_string(),
            grpc_code,
            http_code,
            description: String::new(),
            title: String::new(),
            public_message: String::new(),
            internal_message: String::new(),
            deprecated: String::new(),
            arguments: Vec::new(),
            localization: Localization::new(),
        }
    }
}

/// Inferred type of one argument and where it was first seen
struct Inference {
    arg_type: ArgumentType,
    field: TextField,
    locale: LocaleTag,
}

#[derive(Debug)]
pub struct ErrorBuilder {
    domain: String,
    namespace: String,
    default_locale: LocaleTag,
    template_options: TemplateOptions,
    preferences: BuilderPreferences,
    used_codes: BTreeSet<String>,
    warnings: Vec<BuildWarning>,
    entries_seen: usize,
}

impl ErrorBuilder {
    pub fn new(default_locale: LocaleTag) -> Self {
        Self {
            domain: String::new(),
            namespace: String::new(),
            default_locale,
            template_options: TemplateOptions::default(),
            preferences: BuilderPreferences::default(),
            used_codes: BTreeSet::new(),
            warnings: Vec::new(),
            entries_seen: 0,
        }
    }

    /// Domain and namespace prefixed to every unique ID. Both are expected to be validated.
    pub fn with_scope(mut self, domain: &str, namespace: &str) -> Self {
        self.domain = domain.trim().to_string();
        self.namespace = namespace.trim().to_string();
        self
    }

    pub fn with_template_options(mut self, options: TemplateOptions) -> Self {
        self.template_options = options;
        self
    }

    pub fn with_preferences(mut self, preferences: BuilderPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    /// Range warnings raised so far
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<BuildWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Whether a normalized code has already been built
    pub fn is_code_used(&self, code: &str) -> bool {
        self.used_codes.contains(code)
    }

    pub fn built_count(&self) -> usize {
        self.used_codes.len()
    }

    /// Validate one entry and turn it into an immutable definition
    pub fn build(&mut self, input: ErrorInput) -> BuildResult<ErrorDefinition> {
        let index = self.entries_seen;
        self.entries_seen += 1;
        let entry_key = input.code.trim().to_string();

        with_entry_context(&entry_key, index, || {
            let result = self.build_entry(input);
            match &result {
                Ok(definition) => {
                    log_success!(codes::success::ERROR_DEFINITION_BUILT, "Built error definition",
                        "code" => definition.code(),
                        "uid" => definition.uid(),
                        "arguments" => definition.arguments.len()
                    );
                }
                Err(error) => {
                    log_error!(error.error_code(), &error.to_string(),
                        "code" => error.entry_code()
                    );
                }
            }
            result
        })
    }

    fn build_entry(&mut self, input: ErrorInput) -> BuildResult<ErrorDefinition> {
        let code = self.normalize_code(&input.code)?;

        let title = required_text(&code, TextField::Title, &input.title)?;
        let description = required_text(&code, TextField::Description, &input.description)?;
        let public_message = required_text(&code, TextField::PublicMessage, &input.public_message)?;
        let internal_message =
            required_text(&code, TextField::InternalMessage, &input.internal_message)?;

        let deprecated = input.deprecated.trim().to_string();
        if !naming::is_valid_text(&deprecated) {
            return Err(BuildError::InvalidText {
                code,
                field: TextField::DeprecationNotice,
            });
        }

        let warnings = self.check_status_codes(&code, input.grpc_code, input.http_code)?;

        if input.arguments.len() > MAX_ARGUMENTS_PER_ERROR {
            return Err(BuildError::LimitExceeded {
                code,
                what: "arguments".to_string(),
                limit: MAX_ARGUMENTS_PER_ERROR,
            });
        }

        let mut declared: BTreeSet<&str> = BTreeSet::new();
        for argument in &input.arguments {
            if !declared.insert(argument.name()) {
                return Err(BuildError::DuplicateArgument {
                    code,
                    name: argument.name().to_string(),
                });
            }
        }

        if let Some(name) = input
            .localization
            .argument_names()
            .find(|name| !declared.contains(name))
        {
            return Err(BuildError::UnknownLocalizedArgument {
                code,
                name: name.to_string(),
            });
        }

        if deprecated.is_empty()
            && input
                .localization
                .iter(TextField::DeprecationNotice)
                .any(|(_, value)| !value.is_empty())
        {
            return Err(BuildError::OrphanDeprecationTranslation { code });
        }

        let mut inferred: BTreeMap<String, Inference> = BTreeMap::new();
        let public_templates = self.analyze_message(
            &code,
            TextField::PublicMessage,
            &public_message,
            &input.localization,
            &declared,
            &mut inferred,
        )?;
        let internal_templates = self.analyze_message(
            &code,
            TextField::InternalMessage,
            &internal_message,
            &input.localization,
            &declared,
            &mut inferred,
        )?;

        let arguments = resolve_argument_types(&code, &input.arguments, &inferred)?;

        let mut localization = input.localization;
        let locale = self.default_locale.clone();
        let defaults = [
            (TextField::Title, &title),
            (TextField::Description, &description),
            (TextField::PublicMessage, &public_message),
            (TextField::InternalMessage, &internal_message),
            (TextField::DeprecationNotice, &deprecated),
        ];
        for (field, value) in defaults {
            localization
                .set(field, locale.clone(), value.clone())
                .map_err(|source| BuildError::Localization {
                    code: code.clone(),
                    source,
                })?;
        }
        for argument in &arguments {
            localization
                .set_argument(
                    argument.name(),
                    locale.clone(),
                    argument.description().to_string(),
                )
                .map_err(|source| BuildError::Localization {
                    code: code.clone(),
                    source,
                })?;
        }

        for warning in &warnings {
            if self.preferences.log_range_warnings {
                log_warning!(code = warning.warning_code(), &warning.to_string(),
                    "code" => warning.entry_code()
                );
            }
        }
        self.warnings.extend(warnings);
        self.used_codes.insert(code.clone());

        Ok(ErrorDefinition {
            uid: self.unique_id(&code),
            code,
            http_code: input.http_code,
            grpc_code: input.grpc_code,
            title,
            description,
            public_message,
            internal_message,
            deprecated,
            arguments,
            localization,
            default_locale: locale,
            public_templates,
            internal_templates,
        })
    }

    fn normalize_code(&self, raw: &str) -> BuildResult<String> {
        let raw = raw.trim();
        let invalid = |reason: String| BuildError::InvalidCode {
            code: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("error code is empty".to_string()));
        }
        if !naming::is_valid_text(raw) {
            return Err(invalid("error code is not valid text".to_string()));
        }

        let code = naming::to_camel(raw);
        if code.is_empty() || !naming::is_identifier(&code) {
            return Err(invalid(format!(
                "normalized code '{}' must match {}",
                code, IDENTIFIER_PATTERN
            )));
        }

        if self.used_codes.contains(&code) {
            return Err(BuildError::DuplicateCode { code });
        }

        Ok(code)
    }

    fn check_status_codes(
        &self,
        code: &str,
        grpc_code: ProtocolCode,
        http_code: i32,
    ) -> BuildResult<Vec<BuildWarning>> {
        if grpc_code.is_ok() {
            return Err(BuildError::SuccessProtocolCode {
                code: code.to_string(),
            });
        }

        let mut warnings = Vec::new();
        if !grpc_code.is_recognized() {
            warnings.push(BuildWarning::ProtocolCodeOutOfRange {
                code: code.to_string(),
                value: grpc_code.as_u32(),
            });
        }
        if !(100..=599).contains(&http_code) {
            warnings.push(BuildWarning::HttpCodeOutOfRange {
                code: code.to_string(),
                value: http_code,
            });
        }

        if self.preferences.strict_status_codes {
            if let Some(warning) = warnings.first() {
                return Err(BuildError::StatusCodeOutOfRange {
                    code: code.to_string(),
                    detail: warning.to_string(),
                });
            }
        }

        Ok(warnings)
    }

    /// Extract fields from a message in every locale, returning runtime templates per locale.
    /// The directly supplied value stands for the default locale.
    fn analyze_message(
        &self,
        code: &str,
        field: TextField,
        default_value: &str,
        localization: &Localization,
        declared: &BTreeSet<&str>,
        inferred: &mut BTreeMap<String, Inference>,
    ) -> BuildResult<BTreeMap<LocaleTag, String>> {
        let sources = std::iter::once((&self.default_locale, default_value)).chain(
            localization
                .iter(field)
                .filter(|(locale, _)| **locale != self.default_locale),
        );

        let mut templates = BTreeMap::new();
        for (locale, text) in sources {
            let extraction = template::extract_fields(text, &self.template_options).map_err(
                |source| BuildError::InvalidTemplate {
                    code: code.to_string(),
                    field,
                    locale: locale.clone(),
                    source,
                },
            )?;

            for extracted in extraction.fields.values() {
                if !declared.contains(extracted.name.as_str()) {
                    return Err(BuildError::UndeclaredArgument {
                        code: code.to_string(),
                        field,
                        locale: locale.clone(),
                        name: extracted.name.clone(),
                        span: extracted.span,
                    });
                }

                match inferred.entry(extracted.name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(Inference {
                            arg_type: extracted.field_type,
                            field,
                            locale: locale.clone(),
                        });
                    }
                    Entry::Occupied(mut slot) => {
                        let seen = slot.get_mut();
                        seen.arg_type = seen.arg_type.unify(extracted.field_type).ok_or_else(|| {
                            BuildError::InferredTypeConflict {
                                code: code.to_string(),
                                name: extracted.name.clone(),
                                first: seen.arg_type,
                                second: extracted.field_type,
                                field,
                                locale: locale.clone(),
                            }
                        })?;
                    }
                }
            }

            templates.insert(locale.clone(), extraction.runtime_template);
        }

        Ok(templates)
    }

    fn unique_id(&self, code: &str) -> String {
        [self.domain.as_str(), self.namespace.as_str(), code]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn required_text(code: &str, field: TextField, value: &str) -> BuildResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BuildError::EmptyField {
            code: code.to_string(),
            field,
        });
    }
    if !naming::is_valid_text(value) {
        return Err(BuildError::InvalidText {
            code: code.to_string(),
            field,
        });
    }
    Ok(value.to_string())
}

/// Declared `unknown` arguments take the inferred type; other declarations must agree with it
fn resolve_argument_types(
    code: &str,
    arguments: &[Argument],
    inferred: &BTreeMap<String, Inference>,
) -> BuildResult<Vec<Argument>> {
    arguments
        .iter()
        .map(|argument| match inferred.get(argument.name()) {
            None => Ok(argument.clone()),
            Some(inference) => argument
                .arg_type()
                .unify(inference.arg_type)
                .map(|resolved| argument.with_type(resolved))
                .ok_or_else(|| BuildError::ArgumentTypeConflict {
                    code: code.to_string(),
                    name: argument.name().to_string(),
                    declared: argument.arg_type(),
                    inferred: inference.arg_type,
                    field: inference.field,
                    locale: inference.locale.clone(),
                }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tag(value: &str) -> LocaleTag {
        LocaleTag::parse(value).unwrap()
    }

    fn builder() -> ErrorBuilder {
        ErrorBuilder::new(tag("en"))
            .with_scope("acme.com", "auth")
            .with_preferences(BuilderPreferences {
                log_range_warnings: false,
                strict_status_codes: false,
            })
    }

    fn input(code: &str) -> ErrorInput {
        ErrorInput {
            description: "Raised when a resource is missing".to_string(),
            title: "Not found".to_string(),
            public_message: "Resource {{ string .Name }} was not found".to_string(),
            internal_message: "Lookup of {{ .Name }} failed after {{ .Attempts | int }} attempts"
                .to_string(),
            arguments: vec![
                Argument::new("Name", "Resource name", "unknown").unwrap(),
                Argument::new("Attempts", "Number of lookups", "unknown").unwrap(),
            ],
            ..ErrorInput::new(code, ProtocolCode::NotFound, 404)
        }
    }

    #[test]
    fn test_build_valid_definition() {
        let mut builder = builder();
        let definition = builder.build(input("not_found")).unwrap();

        assert_eq!(definition.code(), "NotFound");
        assert_eq!(definition.uid(), "acme.com/auth/NotFound");
        assert_eq!(definition.http_code(), 404);
        assert_eq!(definition.grpc_code(), ProtocolCode::NotFound);
        assert!(!definition.is_deprecated());

        let types: Vec<(String, ArgumentType)> = definition
            .arguments()
            .iter()
            .map(|arg| (arg.name().to_string(), arg.arg_type()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("Name".to_string(), ArgumentType::String),
                ("Attempts".to_string(), ArgumentType::Int),
            ]
        );

        assert_eq!(
            definition.public_message_template(&tag("en")),
            Some("Resource {{.Name}} was not found")
        );
        assert_eq!(
            definition.internal_message_template(&tag("fr")),
            Some("Lookup of {{.Name}} failed after {{.Attempts}} attempts")
        );
        assert!(builder.is_code_used("NotFound"));
        assert!(builder.warnings().is_empty());
    }

    #[test]
    fn test_default_locale_is_completed() {
        let mut builder = builder();
        let definition = builder.build(input("NotFound")).unwrap();
        let localization = definition.localization();
        let en = tag("en");

        for field in [
            TextField::Title,
            TextField::Description,
            TextField::PublicMessage,
            TextField::InternalMessage,
        ] {
            assert!(localization.get(field, &en).is_some(), "missing {}", field);
        }
        assert_eq!(localization.get(TextField::DeprecationNotice, &en), Some(""));
        assert_eq!(localization.get_argument("Name", &en), Some("Resource name"));
        assert_eq!(
            definition.localized(TextField::Title, &tag("de")),
            Some("Not found")
        );
    }

    #[test]
    fn test_direct_value_overrides_default_locale_translation() {
        let mut entry = input("NotFound");
        entry.localization.add_title("en", "Stale title").unwrap();
        entry.localization.add_title("fr", "Introuvable").unwrap();

        let definition = builder().build(entry).unwrap();
        assert_eq!(definition.localized(TextField::Title, &tag("en")), Some("Not found"));
        assert_eq!(definition.localized(TextField::Title, &tag("fr")), Some("Introuvable"));
    }

    #[test]
    fn test_code_normalization_and_duplicates() {
        let mut builder = builder();
        builder.build(input("resource-missing")).unwrap();

        assert_matches!(
            builder.build(input("ResourceMissing")),
            Err(BuildError::DuplicateCode { code }) if code == "ResourceMissing"
        );
        assert_matches!(builder.build(input("   ")), Err(BuildError::InvalidCode { .. }));
        assert_matches!(builder.build(input("!!!")), Err(BuildError::InvalidCode { .. }));
        assert_eq!(builder.built_count(), 1);
    }

    #[test]
    fn test_failed_entry_does_not_reserve_code() {
        let mut builder = builder();
        let mut broken = input("Conflict");
        broken.title = " ".to_string();
        assert_matches!(
            builder.build(broken),
            Err(BuildError::EmptyField { field: TextField::Title, .. })
        );

        assert!(builder.build(input("Conflict")).is_ok());
    }

    #[test]
    fn test_required_fields_and_text() {
        let mut entry = input("A");
        entry.internal_message = String::new();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::EmptyField { field: TextField::InternalMessage, .. })
        );

        let mut entry = input("A");
        entry.description = "bad\u{0}".to_string();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::InvalidText { field: TextField::Description, .. })
        );
    }

    #[test]
    fn test_status_codes() {
        let entry = ErrorInput {
            grpc_code: ProtocolCode::Ok,
            ..input("Fine")
        };
        assert_matches!(builder().build(entry), Err(BuildError::SuccessProtocolCode { .. }));

        let mut builder = builder();
        let entry = ErrorInput {
            grpc_code: ProtocolCode::Unrecognized(42),
            http_code: 42,
            ..input("Odd")
        };
        assert!(builder.build(entry).is_ok());
        assert_eq!(
            builder.warnings(),
            &[
                BuildWarning::ProtocolCodeOutOfRange {
                    code: "Odd".to_string(),
                    value: 42
                },
                BuildWarning::HttpCodeOutOfRange {
                    code: "Odd".to_string(),
                    value: 42
                },
            ]
        );
        assert_eq!(builder.take_warnings().len(), 2);
        assert!(builder.warnings().is_empty());
    }

    #[test]
    fn test_strict_status_codes() {
        let mut builder = ErrorBuilder::new(tag("en")).with_preferences(BuilderPreferences {
            log_range_warnings: false,
            strict_status_codes: true,
        });
        let entry = ErrorInput {
            http_code: 700,
            ..input("Strict")
        };
        assert_matches!(builder.build(entry), Err(BuildError::StatusCodeOutOfRange { .. }));
        assert!(!builder.is_code_used("Strict"));
    }

    #[test]
    fn test_duplicate_argument() {
        let mut entry = input("Dup");
        entry
            .arguments
            .push(Argument::new("Name", "Again", "string").unwrap());
        assert_matches!(
            builder().build(entry),
            Err(BuildError::DuplicateArgument { name, .. }) if name == "Name"
        );
    }

    #[test]
    fn test_unknown_localized_argument() {
        let mut entry = input("Loc");
        entry
            .localization
            .add_argument("Ghost", "Nobody", "fr")
            .unwrap();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::UnknownLocalizedArgument { name, .. }) if name == "Ghost"
        );
    }

    #[test]
    fn test_undeclared_template_argument() {
        let mut entry = input("Undeclared");
        entry
            .localization
            .add_public_message("de", "{{ .Name }} fehlt ({{ .Missing }})")
            .unwrap();

        let error = builder().build(entry).unwrap_err();
        assert_matches!(
            &error,
            BuildError::UndeclaredArgument { name, field: TextField::PublicMessage, locale, .. }
                if name == "Missing" && locale.as_str() == "de"
        );
        assert!(error.span().is_some());
        assert!(error.to_string().contains("'Missing'"));
    }

    #[test]
    fn test_invalid_template_names_locale() {
        let mut entry = input("Broken");
        entry
            .localization
            .add_internal_message("fr", "{{ .Name.Nested }}")
            .unwrap();

        assert_matches!(
            builder().build(entry),
            Err(BuildError::InvalidTemplate {
                field: TextField::InternalMessage,
                locale,
                source: crate::template::TemplateError::MultiSegmentField { .. },
                ..
            }) if locale.as_str() == "fr"
        );
    }

    #[test]
    fn test_conflicting_marker_after_field_fails() {
        let mut entry = input("Marked");
        entry.public_message = "{{ string .Name | int }}".to_string();

        assert_matches!(
            builder().build(entry),
            Err(BuildError::InvalidTemplate {
                field: TextField::PublicMessage,
                source: crate::template::TemplateError::ConflictingFieldType { .. },
                ..
            })
        );
    }

    #[test]
    fn test_type_conflicts() {
        let mut entry = input("Typed");
        entry.arguments[0] = Argument::new("Name", "Resource name", "int").unwrap();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::ArgumentTypeConflict {
                declared: ArgumentType::Int,
                inferred: ArgumentType::String,
                ..
            })
        );

        let mut entry = input("Locales");
        entry
            .localization
            .add_public_message("fr", "{{ int .Name }} introuvable")
            .unwrap();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::InferredTypeConflict { locale, .. }) if locale.as_str() == "fr"
        );
    }

    #[test]
    fn test_declared_type_is_kept_without_marker() {
        let mut entry = input("Declared");
        entry.arguments[1] = Argument::new("Attempts", "Number of lookups", "float").unwrap();
        entry.internal_message = "Lookup of {{ .Name }} failed after {{ .Attempts }}".to_string();

        let definition = builder().build(entry).unwrap();
        assert_eq!(
            definition.argument("Attempts").map(Argument::arg_type),
            Some(ArgumentType::Float)
        );
    }

    #[test]
    fn test_deprecation_translations() {
        let mut entry = input("Orphan");
        entry.localization.add_deprecated("fr", "Obsolète").unwrap();
        assert_matches!(
            builder().build(entry),
            Err(BuildError::OrphanDeprecationTranslation { .. })
        );

        let mut entry = input("Old");
        entry.deprecated = "Use NotFound instead".to_string();
        entry.localization.add_deprecated("fr", "Utilisez NotFound").unwrap();
        let definition = builder().build(entry).unwrap();
        assert!(definition.is_deprecated());
        assert_eq!(
            definition.localized(TextField::DeprecationNotice, &tag("en")),
            Some("Use NotFound instead")
        );
    }

    #[test]
    fn test_uid_without_scope() {
        let definition = ErrorBuilder::new(tag("en"))
            .with_preferences(BuilderPreferences {
                log_range_warnings: false,
                strict_status_codes: false,
            })
            .build(input("Bare"))
            .unwrap();
        assert_eq!(definition.uid(), "Bare");
    }
}
