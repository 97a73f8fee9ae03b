//! Reactive language selection state
//!
//! [`TranslatorService`] owns the supported-language set, the default and
//! preferred languages, and the translation table, and keeps the active
//! translation (`table[preferred]`) up to date as either input changes.

use crate::subject::{BehaviorSubject, Observable};
use crate::{Result, Translation, TranslatorConfig, TranslatorError, Translations};
use parking_lot::ReentrantMutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Runtime language-selection state with push-based change streams.
///
/// Every mutation completes, including all observer callbacks, before the
/// call returns. Mutations from different threads are serialised, and an
/// observer may call back into the service from its callback.
///
/// # Examples
///
/// ```
/// use armature_translator::{TranslatorConfig, TranslatorService};
///
/// let config = TranslatorConfig::from_json(r#"{
///     "supportedLanguages": ["en", "pt"],
///     "defaultLanguage": "en",
///     "translations": {
///         "en": { "menu": { "home": "Home" } },
///         "pt": { "menu": { "home": "Início" } }
///     }
/// }"#)?;
///
/// let translator = TranslatorService::new(config)?;
/// assert_eq!(translator.translate("menu", "home").as_deref(), Some("Home"));
///
/// translator.set_preferred_language("pt")?;
/// assert_eq!(translator.translate("menu", "home").as_deref(), Some("Início"));
///
/// assert!(translator.set_preferred_language("fr").is_err());
/// assert_eq!(translator.preferred_language(), "pt");
/// # Ok::<(), armature_translator::TranslatorError>(())
/// ```
pub struct TranslatorService {
    supported_languages: Vec<String>,
    default_language: BehaviorSubject<String>,
    preferred_language: BehaviorSubject<String>,
    translations: BehaviorSubject<Arc<Translations>>,
    translation: BehaviorSubject<Option<Arc<Translation>>>,
    mutation: ReentrantMutex<()>,
}

impl TranslatorService {
    /// Build the state from a configuration snapshot.
    ///
    /// Fails with [`TranslatorError::UnsupportedLanguage`] when the default
    /// language is not among the supported languages; no instance is produced
    /// in that case.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let TranslatorConfig {
            supported_languages,
            default_language,
            translations,
        } = config;

        let service = Self {
            supported_languages,
            default_language: BehaviorSubject::new(String::new()),
            preferred_language: BehaviorSubject::new(String::new()),
            translations: BehaviorSubject::new(Arc::new(Translations::new())),
            translation: BehaviorSubject::new(None),
            mutation: ReentrantMutex::new(()),
        };

        service.translations.next(Arc::new(translations));
        service.set_default_language(&default_language)?;
        service.set_preferred_language(&default_language)?;

        debug!(
            supported = ?service.supported_languages,
            default_language = %default_language,
            "Translator initialized"
        );

        Ok(service)
    }

    /// Change the default language.
    ///
    /// The active translation is recomputed against the current preferred
    /// language, so this alone never switches it.
    pub fn set_default_language(&self, language: &str) -> Result<()> {
        let _guard = self.mutation.lock();

        self.validate_language(language)?;
        self.default_language.next(language.to_string());
        debug!(language, "Default language set");

        self.update_translation();
        Ok(())
    }

    /// Change the preferred language and switch the active translation to it.
    pub fn set_preferred_language(&self, language: &str) -> Result<()> {
        let _guard = self.mutation.lock();

        self.validate_language(language)?;
        self.preferred_language.next(language.to_string());
        debug!(language, "Preferred language set");

        self.update_translation();
        Ok(())
    }

    /// Replace the whole translation table.
    ///
    /// The table is not checked against the supported languages; a missing
    /// entry for the preferred language leaves the active translation empty.
    pub fn set_translations(&self, translations: Translations) {
        let _guard = self.mutation.lock();

        debug!(languages = translations.len(), "Replacing translation table");
        self.translations.next(Arc::new(translations));

        self.update_translation();
    }

    /// Current default language.
    pub fn default_language(&self) -> String {
        self.default_language.value()
    }

    /// Current preferred language.
    pub fn preferred_language(&self) -> String {
        self.preferred_language.value()
    }

    /// Current translation table.
    pub fn translations(&self) -> Arc<Translations> {
        self.translations.value()
    }

    /// Dictionary for the preferred language, if the table has one.
    pub fn translation(&self) -> Option<Arc<Translation>> {
        self.translation.value()
    }

    /// Look up `namespace`/`key` in the active translation.
    pub fn translate(&self, namespace: &str, key: &str) -> Option<String> {
        self.translation.with_value(|translation| {
            translation
                .as_ref()
                .and_then(|t| t.get(namespace))
                .and_then(|entries| entries.get(key))
                .cloned()
        })
    }

    /// Supported language codes in configuration order.
    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Whether `language` may be used as default or preferred language.
    pub fn is_supported(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }

    /// Stream of default-language values.
    pub fn default_language_stream(&self) -> Observable<String> {
        self.default_language.as_observable()
    }

    /// Stream of preferred-language values.
    pub fn preferred_language_stream(&self) -> Observable<String> {
        self.preferred_language.as_observable()
    }

    /// Stream of translation tables.
    pub fn translations_stream(&self) -> Observable<Arc<Translations>> {
        self.translations.as_observable()
    }

    /// Stream of active translations.
    pub fn translation_stream(&self) -> Observable<Option<Arc<Translation>>> {
        self.translation.as_observable()
    }

    fn validate_language(&self, language: &str) -> Result<()> {
        if !self.is_supported(language) {
            warn!(
                language,
                supported = ?self.supported_languages,
                "Rejected unsupported language"
            );
            return Err(TranslatorError::unsupported_language(
                language,
                &self.supported_languages,
            ));
        }
        Ok(())
    }

    fn update_translation(&self) {
        let preferred = self.preferred_language.value();
        let translation = self
            .translations
            .with_value(|table| table.get(&preferred).cloned().map(Arc::new));

        trace!(
            language = %preferred,
            found = translation.is_some(),
            "Recomputed active translation"
        );

        self.translation.next(translation);
    }
}

impl fmt::Debug for TranslatorService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorService")
            .field("supported_languages", &self.supported_languages)
            .field("default_language", &self.default_language.value())
            .field("preferred_language", &self.preferred_language.value())
            .field("languages", &self.translations.with_value(|t| t.len()))
            .finish()
    }
}
