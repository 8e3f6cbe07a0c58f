use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The language every piece of survey text is expected to be available in.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Text in several languages, keyed by language code.
///
/// A `BTreeMap` keeps serialised output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation, replacing any existing one for the language.
    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(language.into(), text.into());
        self
    }

    /// The text in the given language.
    ///
    /// Falls back to English, then to whichever translation sorts first, then
    /// to the empty string.
    pub fn get(&self, language: &str) -> &str {
        self.0
            .get(language)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The English text, or the best fallback.
    pub fn english(&self) -> &str {
        self.get(FALLBACK_LANGUAGE)
    }

    /// Is there a translation for exactly this language?
    #[cfg(test)]
    pub fn has(&self, language: &str) -> bool {
        self.0.contains_key(language)
    }
}

impl<L, T> FromIterator<(L, T)> for LocalizedText
where
    L: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(language, text)| (language.into(), text.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_english() {
        let text = LocalizedText::new()
            .with("en", "How worried are you?")
            .with("tr", "Ne kadar endişelisin?");
        assert_eq!(text.get("tr"), "Ne kadar endişelisin?");
        assert_eq!(text.get("de"), "How worried are you?");
        assert_eq!(text.english(), "How worried are you?");
    }

    #[test]
    fn lookup_without_english_uses_any_translation() {
        let text = LocalizedText::new().with("tr", "Evet");
        assert_eq!(text.get("de"), "Evet");
        assert_eq!(LocalizedText::new().get("en"), "");
    }

    #[test]
    fn serialises_as_plain_map() {
        let text: LocalizedText = [("tr", "Hayır"), ("en", "No")].into_iter().collect();
        let json = rocket::serde::json::serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"en":"No","tr":"Hayır"}"#);
    }
}
