//! Locale type: validated locale identifiers with a lookup fallback chain.
//!
//! A locale such as `pt-BR` falls back to its language (`pt`) before the
//! catalog's default locale is consulted.

use crate::error::ConfigError;
use std::fmt;
use unic_langid::LanguageIdentifier;

/// A validated, canonicalized locale identifier (e.g. "en", "pt-BR").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    id: LanguageIdentifier,
    code: String,
}

impl Locale {
    /// Parse a BCP 47 language identifier.
    ///
    /// `-` and `_` are both accepted as separators. The result is canonical:
    /// lowercase language, titlecase script, uppercase region, so `pt_br`,
    /// `PT-br` and `pt-BR` all parse to the same locale.
    ///
    /// # Arguments
    /// * `code` - Locale code such as "en", "pt_BR" or "zh-Hant-TW"
    ///
    /// # Returns
    /// The locale, or `ConfigError::InvalidLocale` for malformed or empty codes
    ///
    /// # Example
    /// ```ignore
    /// let locale = Locale::parse("pt_br")?;
    /// assert_eq!(locale.code(), "pt-BR");
    /// ```
    pub fn parse(code: &str) -> Result<Locale, ConfigError> {
        let invalid = || ConfigError::InvalidLocale(code.to_string());

        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }
        let id: LanguageIdentifier = trimmed.parse().map_err(|_| invalid())?;
        if id.language.as_str() == "und" {
            return Err(invalid());
        }

        Ok(Locale {
            code: id.to_string(),
            id,
        })
    }

    /// Canonical code ("pt-BR").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The primary language subtag ("pt" for "pt-BR").
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    pub fn id(&self) -> &LanguageIdentifier {
        &self.id
    }

    /// Codes to try, most specific first: "zh-Hant-TW", "zh-Hant", "zh".
    ///
    /// Variants are dropped first, then the region, then the script.
    pub fn fallback_chain(&self) -> Vec<String> {
        let id = &self.id;
        let candidates = [
            self.code.clone(),
            LanguageIdentifier::from_parts(id.language, id.script, id.region, &[]).to_string(),
            LanguageIdentifier::from_parts(id.language, id.script, None, &[]).to_string(),
            LanguageIdentifier::from_parts(id.language, None, None, &[]).to_string(),
        ];

        let mut chain: Vec<String> = Vec::with_capacity(candidates.len());
        for code in candidates {
            if !chain.contains(&code) {
                chain.push(code);
            }
        }
        chain
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
