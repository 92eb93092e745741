//! Validated error definitions

use super::argument::Argument;
use super::argument_type::ArgumentType;
use super::locale::LocaleTag;
use super::localization::{Localization, TextField};
use super::protocol_code::ProtocolCode;
use serde::Serialize;
use std::collections::BTreeMap;

/// One named, statused, localizable error. Only the builder creates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDefinition {
    pub(crate) uid: String,
    pub(crate) code: String,
    pub(crate) http_code: i32,
    pub(crate) grpc_code: ProtocolCode,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) public_message: String,
    pub(crate) internal_message: String,
    pub(crate) deprecated: String,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) localization: Localization,
    pub(crate) default_locale: LocaleTag,
    pub(crate) public_templates: BTreeMap<LocaleTag, String>,
    pub(crate) internal_templates: BTreeMap<LocaleTag, String>,
}

impl ErrorDefinition {
    /// `domain/namespace/code` with empty components left out
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn http_code(&self) -> i32 {
        self.http_code
    }

    pub fn grpc_code(&self) -> ProtocolCode {
        self.grpc_code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn public_message(&self) -> &str {
        &self.public_message
    }

    pub fn internal_message(&self) -> &str {
        &self.internal_message
    }

    pub fn deprecated(&self) -> &str {
        &self.deprecated
    }

    pub fn is_deprecated(&self) -> bool {
        !self.deprecated.is_empty()
    }

    /// Declared arguments with resolved types, in declaration order
    pub fn arguments(&self) -> Vec<Argument> {
        self.arguments.clone()
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name() == name)
    }

    pub fn uses_argument_type(&self, arg_type: ArgumentType) -> bool {
        self.arguments.iter().any(|arg| arg.arg_type() == arg_type)
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    /// Runtime template of the public message, falling back to the default locale
    pub fn public_message_template(&self, locale: &LocaleTag) -> Option<&str> {
        lookup(&self.public_templates, locale, &self.default_locale)
    }

    /// Runtime template of the internal message, falling back to the default locale
    pub fn internal_message_template(&self, locale: &LocaleTag) -> Option<&str> {
        lookup(&self.internal_templates, locale, &self.default_locale)
    }

    /// Text of a field in `locale`, or in the default locale when missing.
    /// Messages come back as runtime templates.
    pub fn localized(&self, field: TextField, locale: &LocaleTag) -> Option<&str> {
        match field {
            TextField::PublicMessage => self.public_message_template(locale),
            TextField::InternalMessage => self.internal_message_template(locale),
            other => self
                .localization
                .get(other, locale)
                .or_else(|| self.localization.get(other, &self.default_locale)),
        }
    }

    /// Argument description in `locale`, or in the default locale when missing
    pub fn localized_argument(&self, name: &str, locale: &LocaleTag) -> Option<&str> {
        self.localization
            .get_argument(name, locale)
            .or_else(|| self.localization.get_argument(name, &self.default_locale))
    }
}

fn lookup<'a>(
    templates: &'a BTreeMap<LocaleTag, String>,
    locale: &LocaleTag,
    default_locale: &LocaleTag,
) -> Option<&'a str> {
    templates
        .get(locale)
        .or_else(|| templates.get(default_locale))
        .map(String::as_str)
}
