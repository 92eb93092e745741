//! Specification assembly
//!
//! Validates the specification header, feeds each entry through one
//! `ErrorBuilder` and fails the whole specification on the first bad entry.

use super::error::{SpecError, SpecResult};
use super::specification::Specification;
use crate::builder::{BuildError, ErrorBuilder, ErrorInput};
use crate::config::compile_time::model::{MAX_DOMAIN_LENGTH, MAX_NAMESPACE_LENGTH};
use crate::config::compile_time::spec::MAX_ERRORS_PER_SPEC;
use crate::config::runtime::BuilderPreferences;
use crate::logging::codes;
use crate::model::{naming, ErrorDefinition, LocaleTag};
use crate::template::TemplateOptions;
use crate::{log_error, log_info, log_success};
use regex::Regex;
use std::sync::OnceLock;

pub const SUPPORTED_SPEC_VERSIONS: &[&str] = &["1"];

const DOMAIN_PATTERN: &str =
    r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.?$";

fn domain_regex() -> Option<&'static Regex> {
    static DOMAIN_RE: OnceLock<Option<Regex>> = OnceLock::new();
    DOMAIN_RE.get_or_init(|| Regex::new(DOMAIN_PATTERN).ok()).as_ref()
}

/// Whether `domain` is an ASCII fully-qualified domain name with labels of 1 to 63 characters
pub fn is_fqdn(domain: &str) -> bool {
    domain.len() <= MAX_DOMAIN_LENGTH && domain_regex().is_some_and(|re| re.is_match(domain))
}

/// Top-level values of a specification document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecHeader {
    pub spec_version: String,
    pub default_locale: String,
    pub domain: String,
    pub namespace: String,
}

#[derive(Debug)]
pub struct SpecificationAssembler {
    version: String,
    default_locale: LocaleTag,
    domain: String,
    namespace: String,
    builder: ErrorBuilder,
    errors: Vec<ErrorDefinition>,
}

impl SpecificationAssembler {
    pub fn new(header: &SpecHeader) -> SpecResult<Self> {
        let result = Self::validate_header(header);
        if let Err(error) = &result {
            log_error!(error.error_code(), &error.to_string());
        }
        result
    }

    fn validate_header(header: &SpecHeader) -> SpecResult<Self> {
        let version = header.spec_version.trim();
        if !SUPPORTED_SPEC_VERSIONS.contains(&version) {
            return Err(SpecError::UnsupportedVersion {
                version: version.to_string(),
                supported: SUPPORTED_SPEC_VERSIONS.join(", "),
            });
        }

        let default_locale = LocaleTag::parse(&header.default_locale)
            .map_err(|source| SpecError::InvalidDefaultLocale { source })?;

        let domain = header.domain.trim();
        if !domain.is_empty() && !is_fqdn(domain) {
            return Err(SpecError::InvalidDomain {
                domain: domain.to_string(),
                reason: format!(
                    "expected a fully qualified domain name of at most {} characters",
                    MAX_DOMAIN_LENGTH
                ),
            });
        }

        let namespace = header.namespace.trim();
        if !naming::is_valid_text(namespace) {
            return Err(SpecError::InvalidNamespace {
                namespace: namespace.to_string(),
                reason: "not valid text".to_string(),
            });
        }
        if namespace.chars().count() > MAX_NAMESPACE_LENGTH {
            return Err(SpecError::InvalidNamespace {
                namespace: namespace.to_string(),
                reason: format!("longer than {} characters", MAX_NAMESPACE_LENGTH),
            });
        }

        let builder = ErrorBuilder::new(default_locale.clone()).with_scope(domain, namespace);

        Ok(Self {
            version: version.to_string(),
            default_locale,
            domain: domain.to_string(),
            namespace: namespace.to_string(),
            builder,
            errors: Vec::new(),
        })
    }

    pub fn with_template_options(mut self, options: TemplateOptions) -> Self {
        self.builder = self.builder.with_template_options(options);
        self
    }

    pub fn with_preferences(mut self, preferences: BuilderPreferences) -> Self {
        self.builder = self.builder.with_preferences(preferences);
        self
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    /// Index the next entry will get
    pub fn next_index(&self) -> usize {
        self.errors.len()
    }

    /// Build one entry and keep it
    pub fn add(&mut self, input: ErrorInput) -> SpecResult<&ErrorDefinition> {
        let index = self.next_index();
        if index >= MAX_ERRORS_PER_SPEC {
            return Err(SpecError::LimitExceeded {
                what: "error entries".to_string(),
                limit: MAX_ERRORS_PER_SPEC,
            });
        }

        let code = input.code.trim().to_string();
        let definition = self
            .builder
            .build(input)
            .map_err(|source| SpecError::Entry {
                index,
                code,
                source,
            })?;

        self.errors.push(definition);
        Ok(&self.errors[index])
    }

    /// Wrap an entry failure that happened before the entry reached the builder
    pub fn entry_error(&self, code: &str, source: BuildError) -> SpecError {
        SpecError::Entry {
            index: self.next_index(),
            code: code.trim().to_string(),
            source,
        }
    }

    pub fn finish(mut self) -> SpecResult<Specification> {
        if self.errors.is_empty() {
            let error = SpecError::Empty;
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        let specification = Specification {
            version: self.version,
            default_locale: self.default_locale,
            domain: self.domain,
            namespace: self.namespace,
            errors: self.errors,
            warnings: self.builder.take_warnings(),
        };

        log_success!(codes::success::SPECIFICATION_ASSEMBLED, "Assembled specification",
            "errors" => specification.len(),
            "locales" => specification.all_locales().len(),
            "warnings" => specification.warnings().len()
        );

        Ok(specification)
    }
}

/// Build a specification from a header and its entries
pub fn assemble(header: &SpecHeader, entries: Vec<ErrorInput>) -> SpecResult<Specification> {
    log_info!("Assembling specification", "entries" => entries.len());

    let mut assembler = SpecificationAssembler::new(header)?;
    for entry in entries {
        assembler.add(entry)?;
    }
    assembler.finish()
}
