//! BCP 47 locale tags
//!
//! Tags are checked for well-formedness and brought into canonical case
//! (`en-us` becomes `en-US`, `zh_hant_tw` becomes `zh-Hant-TW`). Subtags are not
//! checked against the IANA registry.

use super::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    pub fn parse(value: &str) -> ModelResult<Self> {
        canonicalize(value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocaleTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

fn is_alpha(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_digit(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn is_variant(s: &str) -> bool {
    match s.len() {
        5..=8 => true,
        4 => s.as_bytes()[0].is_ascii_digit(),
        _ => false,
    }
}

fn titlecase(s: &str) -> String {
    let mut out = s.to_ascii_lowercase();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

fn canonicalize(value: &str) -> ModelResult<String> {
    let fail = |reason: &str| ModelError::invalid_locale(value, reason);

    if value.trim().is_empty() {
        return Err(fail("tag is empty"));
    }

    let normalized = value.replace('_', "-");
    let subtags: Vec<&str> = normalized.split('-').collect();

    if subtags
        .iter()
        .any(|s| s.is_empty() || s.len() > 8 || !s.bytes().all(|b| b.is_ascii_alphanumeric()))
    {
        return Err(fail("subtags must be 1 to 8 ASCII letters or digits"));
    }

    let mut out: Vec<String> = Vec::with_capacity(subtags.len());
    let mut rest = subtags.iter().copied().peekable();

    // Language
    let language = rest.next().unwrap_or_default();
    if language.eq_ignore_ascii_case("x") {
        out.push("x".to_string());
        return private_use(rest, out).ok_or_else(|| fail("empty private use section"));
    }
    if !is_alpha(language) || !matches!(language.len(), 2 | 3 | 5..=8) {
        return Err(fail("language subtag must be 2-3 or 5-8 letters"));
    }
    out.push(language.to_ascii_lowercase());

    // Extended language subtags
    if language.len() <= 3 {
        let mut extlangs = 0;
        while let Some(s) = rest.next_if(|s| s.len() == 3 && is_alpha(s)) {
            extlangs += 1;
            if extlangs > 3 {
                return Err(fail("too many extended language subtags"));
            }
            out.push(s.to_ascii_lowercase());
        }
    }

    // Script
    if let Some(s) = rest.next_if(|s| s.len() == 4 && is_alpha(s)) {
        out.push(titlecase(s));
    }

    // Region
    if let Some(s) = rest.next_if(|s| (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && is_digit(s)))
    {
        out.push(s.to_ascii_uppercase());
    }

    // Variants
    let mut variants: Vec<String> = Vec::new();
    while let Some(s) = rest.next_if(|s| is_variant(s)) {
        let variant = s.to_ascii_lowercase();
        if variants.contains(&variant) {
            return Err(fail("duplicate variant subtag"));
        }
        variants.push(variant);
    }
    out.extend(variants);

    // Extensions
    let mut singletons: Vec<String> = Vec::new();
    while let Some(singleton) = rest.next_if(|s| s.len() == 1 && !s.eq_ignore_ascii_case("x")) {
        let singleton = singleton.to_ascii_lowercase();
        if singletons.contains(&singleton) {
            return Err(fail("duplicate extension singleton"));
        }
        out.push(singleton.clone());
        singletons.push(singleton);

        let mut count = 0;
        while let Some(s) = rest.next_if(|s| s.len() >= 2) {
            out.push(s.to_ascii_lowercase());
            count += 1;
        }
        if count == 0 {
            return Err(fail("extension singleton without subtags"));
        }
    }

    // Private use
    match rest.next() {
        None => Ok(out.join("-")),
        Some(s) if s.eq_ignore_ascii_case("x") => {
            out.push("x".to_string());
            private_use(rest, out).ok_or_else(|| fail("empty private use section"))
        }
        Some(s) => Err(fail(&format!("unexpected subtag '{}'", s))),
    }
}

fn private_use<'a>(rest: impl Iterator<Item = &'a str>, mut out: Vec<String>) -> Option<String> {
    let before = out.len();
    out.extend(rest.map(str::to_ascii_lowercase));
    (out.len() > before).then(|| out.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn canon(value: &str) -> String {
        LocaleTag::parse(value).unwrap().to_string()
    }

    #[test]
    fn test_simple_tags() {
        assert_eq!(canon("en"), "en");
        assert_eq!(canon("EN"), "en");
        assert_eq!(canon("zh"), "zh");
        assert_eq!(canon("en-us"), "en-US");
        assert_eq!(canon("pt_BR"), "pt-BR");
    }

    #[test]
    fn test_script_region_variant() {
        assert_eq!(canon("zh_hant_tw"), "zh-Hant-TW");
        assert_eq!(canon("sr-latn-rs"), "sr-Latn-RS");
        assert_eq!(canon("es-419"), "es-419");
        assert_eq!(canon("de-CH-1901"), "de-CH-1901");
        assert_eq!(canon("sl-rozaj-biske"), "sl-rozaj-biske");
    }

    #[test]
    fn test_extensions_and_private_use() {
        assert_eq!(canon("en-US-u-ca-gregory"), "en-US-u-ca-gregory");
        assert_eq!(canon("en-x-Custom"), "en-x-custom");
        assert_eq!(canon("x-whatever"), "x-whatever");
    }

    #[test]
    fn test_invalid_tags() {
        assert_matches!(LocaleTag::parse(""), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(LocaleTag::parse("e"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(LocaleTag::parse("english"), Ok(_));
        assert_matches!(LocaleTag::parse("en--US"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(LocaleTag::parse("en-US-u"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(LocaleTag::parse("en-a-b-c"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(LocaleTag::parse("12"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(
            LocaleTag::parse("en US"),
            Err(ModelError::InvalidLocale { value, .. }) if value == "en US"
        );
        assert_matches!(LocaleTag::parse("toolonglanguage"), Err(_));
    }

    #[test]
    fn test_language_accessor_and_ordering() {
        let tag = LocaleTag::parse("ru-RU").unwrap();
        assert_eq!(tag.language(), "ru");

        let mut tags = vec![
            LocaleTag::parse("ru").unwrap(),
            LocaleTag::parse("en").unwrap(),
        ];
        tags.sort();
        assert_eq!(tags[0].as_str(), "en");
    }

    #[test]
    fn test_serde_round_trip_canonicalizes() {
        let tag: LocaleTag = serde_json::from_str("\"en_gb\"").unwrap();
        assert_eq!(tag.as_str(), "en-GB");
        assert!(serde_json::from_str::<LocaleTag>("\"-\"").is_err());
    }
}
