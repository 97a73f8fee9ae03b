//! Translator configuration
//!
//! The configuration snapshot a [`TranslatorService`](crate::TranslatorService)
//! is built from. It can be assembled in code or loaded from JSON or TOML.
//!
//! ```json
//! {
//!   "supportedLanguages": ["en", "pt"],
//!   "defaultLanguage": "en",
//!   "translations": {
//!     "en": { "menu": { "home": "Home" } },
//!     "pt": { "menu": { "home": "Início" } }
//!   }
//! }
//! ```

use crate::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One language's dictionary: namespace -> entry key -> localized string.
pub type Translation = HashMap<String, HashMap<String, String>>;

/// Dictionaries keyed by language code.
pub type Translations = HashMap<String, Translation>;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Construction input for the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorConfig {
    /// Language codes eligible as default or preferred, in display order
    pub supported_languages: Vec<String>,
    /// Initial default and preferred language
    pub default_language: String,
    /// Full translation table
    #[serde(default)]
    pub translations: Translations,
}

impl TranslatorConfig {
    /// Create a configuration with an empty translation table.
    pub fn new<I, S>(supported_languages: I, default_language: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported_languages: supported_languages.into_iter().map(Into::into).collect(),
            default_language: default_language.into(),
            translations: Translations::new(),
        }
    }

    /// Set the translation table.
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    /// Add or replace the dictionary for one language.
    pub fn with_translation(mut self, language: impl Into<String>, translation: Translation) -> Self {
        self.translations.insert(language.into(), translation);
        self
    }

    /// Parse a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse `content` in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => Self::from_json(content),
            ConfigFormat::Toml => Self::from_toml(content),
        }
    }

    /// Load from a `.json` or `.toml` file, picking the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TranslatorError::Config(format!("No file extension: {}", path.display())))?;

        let format = ConfigFormat::from_extension(ext)
            .ok_or_else(|| TranslatorError::Config(format!("Unsupported format: {}", ext)))?;

        debug!(path = %path.display(), ?format, "Loading translator configuration");

        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Check structural requirements that don't depend on language membership.
    pub fn validate(&self) -> Result<()> {
        if self.supported_languages.is_empty() {
            return Err(TranslatorError::Config(
                "supportedLanguages must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `language` is in the supported set.
    pub fn is_supported(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "supportedLanguages": ["en", "pt"],
            "defaultLanguage": "en",
            "translations": {
                "en": { "menu": { "home": "Home" } },
                "pt": { "menu": { "home": "Início" } }
            }
        }"#;

        let config = TranslatorConfig::from_json(json).unwrap();
        assert_eq!(config.supported_languages, vec!["en", "pt"]);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.translations["pt"]["menu"]["home"], "Início");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            supportedLanguages = ["en", "pt"]
            defaultLanguage = "pt"

            [translations.en.menu]
            home = "Home"

            [translations.pt."/"]
            button = "Botão"
        "#;

        let config = TranslatorConfig::from_toml(toml).unwrap();
        assert_eq!(config.default_language, "pt");
        assert_eq!(config.translations["en"]["menu"]["home"], "Home");
        assert_eq!(config.translations["pt"]["/"]["button"], "Botão");
    }

    #[test]
    fn test_translations_default_to_empty() {
        let config =
            TranslatorConfig::from_json(r#"{"supportedLanguages": ["en"], "defaultLanguage": "en"}"#)
                .unwrap();
        assert!(config.translations.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = TranslatorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TranslatorError::Json(_)));
    }

    #[test]
    fn test_builder() {
        let mut menu = HashMap::new();
        menu.insert("home".to_string(), "Home".to_string());
        let mut en = Translation::new();
        en.insert("menu".to_string(), menu);

        let config = TranslatorConfig::new(["en", "pt"], "en").with_translation("en", en.clone());

        assert!(config.is_supported("pt"));
        assert!(!config.is_supported("fr"));
        assert_eq!(config.translations.get("en"), Some(&en));
    }

    #[test]
    fn test_validate_rejects_empty_supported() {
        let config = TranslatorConfig::new(Vec::<String>::new(), "en");
        assert!(matches!(config.validate(), Err(TranslatorError::Config(_))));

        assert!(TranslatorConfig::new(["en"], "en").validate().is_ok());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
