//! The validated specification and the queries a generator runs over it

use crate::builder::BuildWarning;
use crate::model::{ArgumentType, ErrorDefinition, LocaleTag, TextField};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specification {
    pub(crate) version: String,
    pub(crate) default_locale: LocaleTag,
    pub(crate) domain: String,
    pub(crate) namespace: String,
    pub(crate) errors: Vec<ErrorDefinition>,
    pub(crate) warnings: Vec<BuildWarning>,
}

/// Bundle key suffix of each text field
fn field_key(field: TextField) -> &'static str {
    match field {
        TextField::Title => "title",
        TextField::Description => "description",
        TextField::PublicMessage => "public_msg",
        TextField::InternalMessage => "internal_msg",
        TextField::DeprecationNotice => "deprecated",
    }
}

impl Specification {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Definitions in the order they were declared
    pub fn errors(&self) -> &[ErrorDefinition] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look up a definition by normalized code
    pub fn get(&self, code: &str) -> Option<&ErrorDefinition> {
        self.errors.iter().find(|error| error.code() == code)
    }

    pub fn get_by_uid(&self, uid: &str) -> Option<&ErrorDefinition> {
        self.errors.iter().find(|error| error.uid() == uid)
    }

    /// Range warnings raised while building the definitions
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Every locale used by any definition, plus the default one
    pub fn all_locales(&self) -> Vec<LocaleTag> {
        let mut locales: BTreeSet<LocaleTag> = BTreeSet::new();
        locales.insert(self.default_locale.clone());
        for error in &self.errors {
            locales.extend(error.localization().all_locales());
        }
        locales.into_iter().collect()
    }

    pub fn uses_argument_type(&self, arg_type: ArgumentType) -> bool {
        self.errors
            .iter()
            .any(|error| error.uses_argument_type(arg_type))
    }

    pub fn has_timestamp_arguments(&self) -> bool {
        self.uses_argument_type(ArgumentType::Timestamp)
    }

    /// Flat key/value asset for one locale.
    ///
    /// Missing translations fall back to the default locale and empty values
    /// are left out. Messages are given as runtime templates.
    pub fn locale_bundle(&self, locale: &LocaleTag) -> BTreeMap<String, String> {
        let mut bundle = BTreeMap::new();

        for error in &self.errors {
            for field in TextField::ALL {
                if let Some(value) = error.localized(field, locale).filter(|v| !v.is_empty()) {
                    bundle.insert(
                        format!("{}_{}", error.uid(), field_key(field)),
                        value.to_string(),
                    );
                }
            }

            for argument in error.arguments() {
                if let Some(value) = error
                    .localized_argument(argument.name(), locale)
                    .filter(|v| !v.is_empty())
                {
                    bundle.insert(
                        format!("{}_argument_{}", error.uid(), argument.name()),
                        value.to_string(),
                    );
                }
            }
        }

        bundle
    }
}
