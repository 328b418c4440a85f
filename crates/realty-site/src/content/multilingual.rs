use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Locales the site publishes in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ar, Locale::Fr];

    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Fr => "fr",
        }
    }

    pub const fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }

    /// Open Graph locale tag.
    pub const fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Ar => "ar_AR",
            Locale::Fr => "fr_FR",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            "fr" => Ok(Locale::Fr),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// The same logical text in every published locale.
///
/// All three locales are always present. Deserialization runs through
/// [`ensure_multilingual`], so partial or malformed payloads are completed with
/// empty strings rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MultilingualValue {
    pub en: String,
    pub ar: String,
    pub fr: String,
}

impl MultilingualValue {
    pub fn new(en: impl Into<String>, ar: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
            fr: fr.into(),
        }
    }

    /// Same text in every locale.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text.clone(), text)
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
            Locale::Fr => &self.fr,
        }
    }

    pub fn set(&mut self, locale: Locale, text: impl Into<String>) {
        let slot = match locale {
            Locale::En => &mut self.en,
            Locale::Ar => &mut self.ar,
            Locale::Fr => &mut self.fr,
        };
        *slot = text.into();
    }

    pub fn is_blank(&self) -> bool {
        Locale::ALL
            .iter()
            .all(|locale| self.get(*locale).trim().is_empty())
    }

    /// Text for `locale`, falling back to English and then to any filled locale.
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        std::iter::once(locale)
            .chain(Locale::ALL)
            .map(|candidate| self.get(candidate))
            .find(|text| !text.trim().is_empty())
    }

    pub fn matches(&self, needle: &str) -> bool {
        Locale::ALL
            .iter()
            .any(|locale| self.get(*locale).eq_ignore_ascii_case(needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Locale, &str)> {
        Locale::ALL.into_iter().map(move |locale| (locale, self.get(locale)))
    }
}

impl<'de> Deserialize<'de> for MultilingualValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(ensure_multilingual(&raw))
    }
}

/// Coerces any JSON value into a complete [`MultilingualValue`]. Never fails.
///
/// Objects contribute their `en`, `ar` and `fr` members (strings as-is, numbers
/// and booleans stringified, anything else empty). A bare string is treated as
/// English text. Every other shape yields an empty value.
pub fn ensure_multilingual(raw: &Value) -> MultilingualValue {
    match raw {
        Value::Object(map) => {
            let mut value = MultilingualValue::default();
            for locale in Locale::ALL {
                let text = match map.get(locale.code()) {
                    Some(Value::String(text)) => text.clone(),
                    Some(Value::Number(number)) => number.to_string(),
                    Some(Value::Bool(flag)) => flag.to_string(),
                    _ => String::new(),
                };
                value.set(locale, text);
            }
            value
        }
        Value::String(text) => MultilingualValue {
            en: text.clone(),
            ..MultilingualValue::default()
        },
        _ => MultilingualValue::default(),
    }
}
