//! Storefront locale (`language-country`) used for `@inContext` queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a locale path segment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("invalid locale segment: {0}")]
    Invalid(String),
}

/// A buyer locale: ISO 639-1 language and ISO 3166-1 country, both stored
/// upper-case as the Storefront API's `LanguageCode`/`CountryCode` enums expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Locale {
    /// Create a locale from language and country codes.
    ///
    /// # Errors
    ///
    /// Returns `LocaleError::Invalid` unless both codes are two ASCII letters.
    pub fn new(language: &str, country: &str) -> Result<Self, LocaleError> {
        if !is_code(language) || !is_code(country) {
            return Err(LocaleError::Invalid(format!("{language}-{country}")));
        }
        Ok(Self {
            language: language.to_ascii_uppercase(),
            country: country.to_ascii_uppercase(),
        })
    }

    /// URL prefix for this locale, e.g. `/en-us`.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        format!("/{self}")
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "EN".to_string(),
            country: "US".to_string(),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Parse a `language-country` path segment such as `en-us` or `FR-CA`.
    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let (language, country) = segment
            .split_once('-')
            .ok_or_else(|| LocaleError::Invalid(segment.to_string()))?;
        Self::new(language, country).map_err(|_| LocaleError::Invalid(segment.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.language.to_ascii_lowercase(),
            self.country.to_ascii_lowercase()
        )
    }
}

fn is_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_segment() {
        let locale: Locale = "fr-ca".parse().unwrap();
        assert_eq!(locale.language, "FR");
        assert_eq!(locale.country, "CA");
        assert_eq!(locale.path_prefix(), "/fr-ca");
    }

    #[test]
    fn test_parse_locale_is_case_insensitive() {
        let locale: Locale = "EN-us".parse().unwrap();
        assert_eq!(locale, Locale::default());
    }

    #[test]
    fn test_parse_locale_rejects_malformed_segments() {
        for segment in ["favicon.ico", "en", "eng-us", "en-u1", "-us", "en_us"] {
            assert!(segment.parse::<Locale>().is_err(), "{segment} should fail");
        }
    }
}
