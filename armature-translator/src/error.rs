//! Error types for translator operations

use thiserror::Error;

/// Errors that can occur while configuring or mutating translator state.
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// A default or preferred language outside the supported set
    #[error("Language \"{language}\" is not in the supported languages: {}", .supported.join(", "))]
    UnsupportedLanguage {
        language: String,
        supported: Vec<String>,
    },

    /// Structurally invalid configuration
    #[error("Invalid translator configuration: {0}")]
    Config(String),

    /// Subscriber installation or filter directive failure
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TranslatorError {
    /// Build the rejection for a language missing from `supported`.
    pub fn unsupported_language(language: impl Into<String>, supported: &[String]) -> Self {
        TranslatorError::UnsupportedLanguage {
            language: language.into(),
            supported: supported.to_vec(),
        }
    }

    /// Check whether this is a language-validation failure.
    pub fn is_unsupported_language(&self) -> bool {
        matches!(self, TranslatorError::UnsupportedLanguage { .. })
    }
}
