use crate::i18n::{Catalog, Locale};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Locales
    pub locale: Locale,
    pub default_locale: Locale,

    // Translation namespace for model-specific keys
    pub scope: String,

    // Catalog file or directory of *.json files
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("I18N_DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string());
        let default_locale =
            Locale::parse(&default_locale).context("I18N_DEFAULT_LOCALE is not a valid locale")?;

        let locale = match std::env::var("I18N_LOCALE") {
            Ok(code) => Locale::parse(&code).context("I18N_LOCALE is not a valid locale")?,
            Err(_) => default_locale.clone(),
        };

        Ok(Self {
            locale,
            default_locale,
            scope: std::env::var("I18N_SCOPE").unwrap_or_else(|_| "sequel".to_string()),
            catalog_path: std::env::var("I18N_CATALOG_PATH").ok().map(PathBuf::from),
        })
    }

    /// Build the catalog this configuration points at.
    ///
    /// Without a catalog path the catalog is empty and every message falls
    /// back to the rule defaults.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new(self.default_locale.clone());
        if let Some(path) = &self.catalog_path {
            catalog
                .load_path(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "I18N_LOCALE",
            "I18N_DEFAULT_LOCALE",
            "I18N_SCOPE",
            "I18N_CATALOG_PATH",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load");
        assert_eq!(config.locale.code(), "en");
        assert_eq!(config.default_locale.code(), "en");
        assert_eq!(config.scope, "sequel");
        assert!(config.catalog_path.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("I18N_LOCALE", "pt_BR");
        std::env::set_var("I18N_SCOPE", "blog");
        let config = Config::from_env().expect("Should load");
        assert_eq!(config.locale.code(), "pt-BR");
        assert_eq!(config.default_locale.code(), "en");
        assert_eq!(config.scope, "blog");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_locale() {
        clear_env();
        std::env::set_var("I18N_LOCALE", "not a locale");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("I18N_LOCALE"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_catalog_from_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, r#"{"en": {"errors": {"messages": {"presence": "is required"}}}}"#)
            .unwrap();
        std::env::set_var("I18N_CATALOG_PATH", &path);

        let config = Config::from_env().expect("Should load");
        let catalog = config.load_catalog().expect("Should load catalog");
        assert!(catalog.has_key(&config.locale, "errors.messages.presence"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_catalog_missing_path() {
        clear_env();
        std::env::set_var("I18N_CATALOG_PATH", "/nonexistent/catalog.json");
        let config = Config::from_env().expect("Should load");
        assert!(config.load_catalog().is_err());
        clear_env();
    }
}
