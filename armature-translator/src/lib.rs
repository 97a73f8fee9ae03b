//! Reactive Translation State for Armature
//!
//! Holds the runtime language selection of an application and keeps the
//! active translation dictionary in step with it:
//!
//! - **Language validation**: default and preferred languages must belong to
//!   a fixed supported set
//! - **Derived translation**: the active dictionary is recomputed whenever the
//!   preferred language or the translation table changes
//! - **Change streams**: replay-latest observables for every tracked value
//! - **Configuration**: build in code or load from JSON/TOML
//!
//! # Quick Start
//!
//! ```rust
//! use armature_translator::{TranslatorConfig, provide_translator};
//!
//! let config = TranslatorConfig::from_json(r#"{
//!     "supportedLanguages": ["en", "pt"],
//!     "defaultLanguage": "en",
//!     "translations": {
//!         "en": { "menu": { "home": "Home" } },
//!         "pt": { "menu": { "home": "Início" } }
//!     }
//! }"#)?;
//!
//! let translator = provide_translator(config)?;
//!
//! let subscription = translator.translation_stream().subscribe(|translation| {
//!     let home = translation
//!         .as_ref()
//!         .and_then(|t| t.get("menu"))
//!         .and_then(|menu| menu.get("home"));
//!     println!("menu.home = {:?}", home);
//! });
//!
//! translator.set_preferred_language("pt")?;
//!
//! let err = translator.set_preferred_language("fr").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Language \"fr\" is not in the supported languages: en, pt"
//! );
//!
//! subscription.unsubscribe();
//! # Ok::<(), armature_translator::TranslatorError>(())
//! ```
//!
//! # Threading
//!
//! [`TranslatorService`] is `Send + Sync`. Mutations are serialised so the
//! emissions of one call are never interleaved with another's, and observers
//! run synchronously on the mutating thread.

mod config;
mod error;
pub mod logging;
mod provider;
mod service;
mod subject;
#[cfg(feature = "tokio")]
mod watch;

pub use config::{ConfigFormat, Translation, Translations, TranslatorConfig};
pub use error::TranslatorError;
pub use provider::{provide_translator, provide_translator_from_file};
pub use service::TranslatorService;
pub use subject::{BehaviorSubject, Observable, Subscription};
#[cfg(feature = "tokio")]
pub use watch::WatchBridge;

/// Result type for translator operations
pub type Result<T> = std::result::Result<T, TranslatorError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Observable, Result, Subscription, Translation, TranslatorConfig, TranslatorError,
        TranslatorService, Translations, provide_translator,
    };
}
