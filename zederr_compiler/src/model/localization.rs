//! Per-locale translations of an error definition's text fields

use super::error::{ModelError, ModelResult};
use super::locale::LocaleTag;
use super::naming;
use crate::config::compile_time::model::MAX_LOCALES_PER_FIELD;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type Translations = BTreeMap<LocaleTag, String>;

/// Translatable text fields of an error definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Title,
    Description,
    PublicMessage,
    InternalMessage,
    DeprecationNotice,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Title,
        TextField::Description,
        TextField::PublicMessage,
        TextField::InternalMessage,
        TextField::DeprecationNotice,
    ];

    /// Whether values of this field are message templates
    pub fn is_message(&self) -> bool {
        matches!(self, TextField::PublicMessage | TextField::InternalMessage)
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextField::Title => "title",
            TextField::Description => "description",
            TextField::PublicMessage => "public message",
            TextField::InternalMessage => "internal message",
            TextField::DeprecationNotice => "deprecation notice",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    title: Translations,
    description: Translations,
    public_message: Translations,
    internal_message: Translations,
    deprecated: Translations,
    arguments: BTreeMap<String, Translations>,
}

fn insert(map: &mut Translations, what: &str, tag: LocaleTag, value: String) -> ModelResult<()> {
    if !map.contains_key(&tag) && map.len() >= MAX_LOCALES_PER_FIELD {
        return Err(ModelError::limit_exceeded(
            &format!("locales of {}", what),
            MAX_LOCALES_PER_FIELD,
        ));
    }
    map.insert(tag, value);
    Ok(())
}

impl Localization {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_map(&self, field: TextField) -> &Translations {
        match field {
            TextField::Title => &self.title,
            TextField::Description => &self.description,
            TextField::PublicMessage => &self.public_message,
            TextField::InternalMessage => &self.internal_message,
            TextField::DeprecationNotice => &self.deprecated,
        }
    }

    fn field_map_mut(&mut self, field: TextField) -> &mut Translations {
        match field {
            TextField::Title => &mut self.title,
            TextField::Description => &mut self.description,
            TextField::PublicMessage => &mut self.public_message,
            TextField::InternalMessage => &mut self.internal_message,
            TextField::DeprecationNotice => &mut self.deprecated,
        }
    }

    /// Parse the locale, check the text and insert. Re-adding a locale overwrites it.
    pub fn add(&mut self, field: TextField, locale: &str, value: &str) -> ModelResult<()> {
        let tag = LocaleTag::parse(locale)?;
        if !naming::is_valid_text(value) {
            return Err(ModelError::invalid_text(&field.to_string(), value));
        }
        self.set(field, tag, value.to_string())
    }

    pub fn add_title(&mut self, locale: &str, value: &str) -> ModelResult<()> {
        self.add(TextField::Title, locale, value)
    }

    pub fn add_description(&mut self, locale: &str, value: &str) -> ModelResult<()> {
        self.add(TextField::Description, locale, value)
    }

    pub fn add_public_message(&mut self, locale: &str, value: &str) -> ModelResult<()> {
        self.add(TextField::PublicMessage, locale, value)
    }

    pub fn add_internal_message(&mut self, locale: &str, value: &str) -> ModelResult<()> {
        self.add(TextField::InternalMessage, locale, value)
    }

    pub fn add_deprecated(&mut self, locale: &str, value: &str) -> ModelResult<()> {
        self.add(TextField::DeprecationNotice, locale, value)
    }

    /// Translation of one argument's description
    pub fn add_argument(&mut self, name: &str, description: &str, locale: &str) -> ModelResult<()> {
        let tag = LocaleTag::parse(locale)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::empty_value("argument name"));
        }
        if !naming::is_valid_text(description) {
            return Err(ModelError::invalid_text("argument description", description));
        }

        self.set_argument(name, tag, description.to_string())
    }

    pub(crate) fn set(&mut self, field: TextField, tag: LocaleTag, value: String) -> ModelResult<()> {
        insert(self.field_map_mut(field), &field.to_string(), tag, value)
    }

    pub(crate) fn set_argument(&mut self, name: &str, tag: LocaleTag, value: String) -> ModelResult<()> {
        let map = self.arguments.entry(name.to_string()).or_default();
        insert(map, &format!("argument {}", name), tag, value)
    }

    pub fn get(&self, field: TextField, locale: &LocaleTag) -> Option<&str> {
        self.field_map(field).get(locale).map(String::as_str)
    }

    pub fn get_argument(&self, name: &str, locale: &LocaleTag) -> Option<&str> {
        self.arguments
            .get(name)
            .and_then(|translations| translations.get(locale))
            .map(String::as_str)
    }

    /// Copy of every translation of a field
    pub fn translations(&self, field: TextField) -> Translations {
        self.field_map(field).clone()
    }

    /// Borrowed view of a field's translations
    pub fn iter(&self, field: TextField) -> impl Iterator<Item = (&LocaleTag, &str)> {
        self.field_map(field)
            .iter()
            .map(|(tag, value)| (tag, value.as_str()))
    }

    pub fn has_translations(&self, field: TextField) -> bool {
        !self.field_map(field).is_empty()
    }

    pub fn title(&self) -> Translations {
        self.translations(TextField::Title)
    }

    pub fn description(&self) -> Translations {
        self.translations(TextField::Description)
    }

    pub fn public_message(&self) -> Translations {
        self.translations(TextField::PublicMessage)
    }

    pub fn internal_message(&self) -> Translations {
        self.translations(TextField::InternalMessage)
    }

    pub fn deprecated(&self) -> Translations {
        self.translations(TextField::DeprecationNotice)
    }

    /// Copy of every argument's translations, keyed by argument name
    pub fn arguments(&self) -> BTreeMap<String, Translations> {
        self.arguments.clone()
    }

    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.arguments.keys().map(String::as_str)
    }

    /// Every locale used anywhere in the model, sorted and deduplicated
    pub fn all_locales(&self) -> Vec<LocaleTag> {
        let mut locales: BTreeSet<LocaleTag> = BTreeSet::new();

        for field in TextField::ALL {
            locales.extend(self.field_map(field).keys().cloned());
        }
        for translations in self.arguments.values() {
            locales.extend(translations.keys().cloned());
        }

        locales.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tag(value: &str) -> LocaleTag {
        LocaleTag::parse(value).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut loc = Localization::new();
        loc.add_title("en", "Not found").unwrap();
        loc.add_title("ru_RU", "Не найдено").unwrap();

        assert_eq!(loc.get(TextField::Title, &tag("en")), Some("Not found"));
        assert_eq!(loc.get(TextField::Title, &tag("ru-RU")), Some("Не найдено"));
        assert_eq!(loc.get(TextField::Description, &tag("en")), None);
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let mut loc = Localization::new();
        loc.add_public_message("en", "first").unwrap();
        loc.add_public_message("EN", "second").unwrap();

        assert_eq!(loc.public_message().len(), 1);
        assert_eq!(loc.get(TextField::PublicMessage, &tag("en")), Some("second"));
    }

    #[test]
    fn test_rejects_invalid_locale_and_text() {
        let mut loc = Localization::new();
        assert_matches!(loc.add_title("not a tag", "x"), Err(ModelError::InvalidLocale { .. }));
        assert_matches!(
            loc.add_description("en", "bad\0"),
            Err(ModelError::InvalidText { field, .. }) if field == "description"
        );
        assert!(loc.add_internal_message("en", "").is_ok());
    }

    #[test]
    fn test_argument_translations() {
        let mut loc = Localization::new();
        loc.add_argument(" UserId ", "User identifier", "en").unwrap();
        loc.add_argument("UserId", "Идентификатор", "ru").unwrap();

        assert_eq!(loc.get_argument("UserId", &tag("ru")), Some("Идентификатор"));
        assert_eq!(loc.argument_names().collect::<Vec<_>>(), vec!["UserId"]);
        assert_matches!(
            loc.add_argument("  ", "desc", "en"),
            Err(ModelError::EmptyValue { .. })
        );
    }

    #[test]
    fn test_accessors_return_copies() {
        let mut loc = Localization::new();
        loc.add_title("en", "Title").unwrap();

        let mut copy = loc.title();
        copy.insert(tag("de"), "Titel".to_string());

        assert_eq!(loc.title().len(), 1);
    }

    #[test]
    fn test_all_locales_is_deduplicated_union() {
        let mut loc = Localization::new();
        loc.add_title("en", "a").unwrap();
        loc.add_description("en", "b").unwrap();
        loc.add_deprecated("fr", "c").unwrap();
        loc.add_argument("Name", "d", "de").unwrap();

        let locales: Vec<String> = loc.all_locales().iter().map(|t| t.to_string()).collect();
        assert_eq!(locales, vec!["de", "en", "fr"]);
    }

    #[test]
    fn test_text_field_classification() {
        assert!(TextField::PublicMessage.is_message());
        assert!(!TextField::Title.is_message());
        assert_eq!(TextField::DeprecationNotice.to_string(), "deprecation notice");
    }
}
