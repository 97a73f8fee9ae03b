//! Shared translator construction
//!
//! Applications build one [`TranslatorService`] at startup and hand clones of
//! the returned `Arc` to every component that renders translated text.

use crate::{Result, TranslatorConfig, TranslatorService};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Validate `config` and build a shareable translator.
///
/// # Examples
///
/// ```
/// use armature_translator::{TranslatorConfig, provide_translator};
///
/// let translator = provide_translator(TranslatorConfig::new(["en", "pt"], "en"))?;
/// let for_navbar = translator.clone();
///
/// translator.set_preferred_language("pt")?;
/// assert_eq!(for_navbar.preferred_language(), "pt");
/// # Ok::<(), armature_translator::TranslatorError>(())
/// ```
pub fn provide_translator(config: TranslatorConfig) -> Result<Arc<TranslatorService>> {
    config.validate()?;

    let service = TranslatorService::new(config)?;
    info!(
        supported = service.supported_languages().len(),
        default_language = %service.default_language(),
        "Translator provided"
    );

    Ok(Arc::new(service))
}

/// Load the configuration from a `.json` or `.toml` file and build a translator.
pub fn provide_translator_from_file(path: impl AsRef<Path>) -> Result<Arc<TranslatorService>> {
    provide_translator(TranslatorConfig::from_file(path)?)
}
