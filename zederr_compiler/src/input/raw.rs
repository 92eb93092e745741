//! Format-agnostic document types
//!
//! These mirror the document layout one to one. Nothing is validated here;
//! conversion into builder input is where values are checked.

use crate::builder::{BuildError, BuildResult, ErrorInput};
use crate::model::{Argument, Localization, ProtocolCode};
use crate::spec::SpecHeader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `locale -> text`
pub type RawTranslations = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpecification {
    pub spec_version: String,
    pub default_locale: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub errors: Vec<RawErrorEntry>,
}

impl RawSpecification {
    pub fn header(&self) -> SpecHeader {
        SpecHeader {
            spec_version: self.spec_version.clone(),
            default_locale: self.default_locale.clone(),
            domain: self.domain.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Protocol code given either as a number or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawProtocolCode {
    Number(u32),
    Name(String),
}

impl RawProtocolCode {
    pub fn resolve(&self) -> crate::model::ModelResult<ProtocolCode> {
        match self {
            Self::Number(value) => Ok(ProtocolCode::from_u32(*value)),
            Self::Name(name) => ProtocolCode::from_name(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawErrorEntry {
    pub code: String,
    pub grpc_code: RawProtocolCode,
    pub http_code: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_message: String,
    #[serde(default)]
    pub internal_message: String,
    #[serde(default)]
    pub deprecated: String,
    #[serde(default)]
    pub arguments: Vec<RawArgument>,
    #[serde(default)]
    pub localization: RawLocalization,
}

fn default_argument_type() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArgument {
    pub name: String,
    pub description: String,
    #[serde(rename = "type", default = "default_argument_type")]
    pub arg_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocalization {
    #[serde(default)]
    pub title: RawTranslations,
    #[serde(default)]
    pub description: RawTranslations,
    #[serde(default)]
    pub public_message: RawTranslations,
    #[serde(default)]
    pub internal_message: RawTranslations,
    #[serde(default)]
    pub deprecated: RawTranslations,
    /// `argument name -> locale -> description`
    #[serde(default)]
    pub arguments: BTreeMap<String, RawTranslations>,
}

impl RawErrorEntry {
    /// Check the per-value schema and produce builder input
    pub fn to_input(&self) -> BuildResult<ErrorInput> {
        let code = self.code.trim();

        let grpc_code = self
            .grpc_code
            .resolve()
            .map_err(|source| BuildError::InvalidStatusCode {
                code: code.to_string(),
                source,
            })?;

        let arguments = self
            .arguments
            .iter()
            .map(|raw| Argument::new(&raw.name, &raw.description, &raw.arg_type))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| BuildError::InvalidArgument {
                code: code.to_string(),
                source,
            })?;

        let localization = self
            .localization
            .to_localization()
            .map_err(|source| BuildError::Localization {
                code: code.to_string(),
                source,
            })?;

        Ok(ErrorInput {
            code: self.code.clone(),
            grpc_code,
            http_code: self.http_code,
            description: self.description.clone(),
            title: self.title.clone(),
            public_message: self.public_message.clone(),
            internal_message: self.internal_message.clone(),
            deprecated: self.deprecated.clone(),
            arguments,
            localization,
        })
    }
}

impl RawLocalization {
    pub fn to_localization(&self) -> crate::model::ModelResult<Localization> {
        let mut localization = Localization::new();

        for (locale, value) in &self.title {
            localization.add_title(locale, value)?;
        }
        for (locale, value) in &self.description {
            localization.add_description(locale, value)?;
        }
        for (locale, value) in &self.public_message {
            localization.add_public_message(locale, value)?;
        }
        for (locale, value) in &self.internal_message {
            localization.add_internal_message(locale, value)?;
        }
        for (locale, value) in &self.deprecated {
            localization.add_deprecated(locale, value)?;
        }
        for (name, translations) in &self.arguments {
            for (locale, value) in translations {
                localization.add_argument(name, value, locale)?;
            }
        }

        Ok(localization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelError, TextField, LocaleTag};
    use assert_matches::assert_matches;

    fn raw_entry() -> RawErrorEntry {
        RawErrorEntry {
            code: "not_found".to_string(),
            grpc_code: RawProtocolCode::Name("NOT_FOUND".to_string()),
            http_code: 404,
            description: "Missing".to_string(),
            title: "Not found".to_string(),
            public_message: "{{ .Id }} missing".to_string(),
            internal_message: "{{ .Id }} missing".to_string(),
            deprecated: String::new(),
            arguments: vec![RawArgument {
                name: "Id".to_string(),
                description: "Identifier".to_string(),
                arg_type: "string".to_string(),
            }],
            localization: RawLocalization::default(),
        }
    }

    #[test]
    fn test_to_input() {
        let mut raw = raw_entry();
        raw.localization
            .title
            .insert("de".to_string(), "Nicht gefunden".to_string());

        let input = raw.to_input().unwrap();
        assert_eq!(input.grpc_code, ProtocolCode::NotFound);
        assert_eq!(input.arguments[0].name(), "Id");
        assert_eq!(
            input
                .localization
                .get(TextField::Title, &LocaleTag::parse("de").unwrap()),
            Some("Nicht gefunden")
        );
    }

    #[test]
    fn test_numeric_and_unknown_protocol_codes() {
        let mut raw = raw_entry();
        raw.grpc_code = RawProtocolCode::Number(20);
        assert_eq!(
            raw.to_input().unwrap().grpc_code,
            ProtocolCode::Unrecognized(20)
        );

        raw.grpc_code = RawProtocolCode::Name("TEAPOT".to_string());
        assert_matches!(
            raw.to_input(),
            Err(BuildError::InvalidStatusCode { source: ModelError::InvalidProtocolCode { .. }, .. })
        );
    }

    #[test]
    fn test_schema_errors() {
        let mut raw = raw_entry();
        raw.arguments[0].arg_type = "uuid".to_string();
        assert_matches!(raw.to_input(), Err(BuildError::InvalidArgument { .. }));

        let mut raw = raw_entry();
        raw.localization
            .public_message
            .insert("not a locale".to_string(), "x".to_string());
        assert_matches!(
            raw.to_input(),
            Err(BuildError::Localization { source: ModelError::InvalidLocale { .. }, .. })
        );
    }
}
